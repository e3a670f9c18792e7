//! Applying colours and textures to every mesh of a fragment.

use crate::showroom::style::Rgb;

/// The material side of a mesh: a base colour and an optional surface map.
pub trait Surface {
    /// Decoded texture handle assigned as the surface map.
    type Map: Clone;

    fn set_base_color(&mut self, color: Rgb);

    fn clear_map(&mut self);

    fn set_map(&mut self, map: Self::Map);

    /// Flag the material so its GPU-side state is rebuilt before the next draw.
    fn mark_needs_update(&mut self);
}

/// A loaded model subtree that can be shown, hidden and repainted.
pub trait Fragment {
    type Surface: Surface;

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Visit the material of every mesh in the subtree.
    fn traverse_surfaces(&mut self, visit: &mut dyn FnMut(&mut Self::Surface));
}

/// Texture handle type of a fragment's surfaces.
pub type MapOf<F> = <<F as Fragment>::Surface as Surface>::Map;

/// Clear every mesh's map and set its base colour. `None` leaves the fragment untouched.
pub fn apply_color<F: Fragment + ?Sized>(fragment: &mut F, color: Option<Rgb>) {
    let Some(color) = color else {
        return;
    };
    fragment.traverse_surfaces(&mut |surface| {
        surface.clear_map();
        surface.set_base_color(color);
        surface.mark_needs_update();
    });
}

/// Assign an already decoded texture as every mesh's surface map.
pub fn apply_texture_map<F: Fragment + ?Sized>(fragment: &mut F, map: &MapOf<F>) {
    fragment.traverse_surfaces(&mut |surface| {
        surface.set_map(map.clone());
        surface.mark_needs_update();
    });
}

/// A texture fetch started on behalf of one registered variant.
///
/// `sequence` is the appearance selection the fetch belongs to; completions
/// for selections older than what the variant already shows are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRequest {
    pub url: String,
    pub model: String,
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Paint {
        color: Option<Rgb>,
        map: Option<&'static str>,
        dirty: bool,
    }

    impl Surface for Paint {
        type Map = &'static str;

        fn set_base_color(&mut self, color: Rgb) {
            self.color = Some(color);
        }

        fn clear_map(&mut self) {
            self.map = None;
        }

        fn set_map(&mut self, map: Self::Map) {
            self.map = Some(map);
        }

        fn mark_needs_update(&mut self) {
            self.dirty = true;
        }
    }

    struct Body(Vec<Paint>);

    impl Fragment for Body {
        type Surface = Paint;

        fn set_visible(&mut self, _visible: bool) {}

        fn is_visible(&self) -> bool {
            true
        }

        fn traverse_surfaces(&mut self, visit: &mut dyn FnMut(&mut Paint)) {
            self.0.iter_mut().for_each(visit);
        }
    }

    fn body(meshes: usize) -> Body {
        Body((0..meshes).map(|_| Paint::default()).collect())
    }

    #[test]
    fn colour_replaces_map_on_every_mesh() {
        let mut body = body(3);
        apply_texture_map(&mut body, &"carbon");
        body.0.iter_mut().for_each(|p| p.dirty = false);

        apply_color(&mut body, Some(Rgb::WHITE));

        assert!(body.0.iter().all(|p| p.map.is_none()));
        assert!(body.0.iter().all(|p| p.color == Some(Rgb::WHITE)));
        assert!(body.0.iter().all(|p| p.dirty));
    }

    #[test]
    fn missing_colour_is_a_no_op() {
        let mut body = body(2);
        apply_color(&mut body, None);
        assert!(body.0.iter().all(|p| p.color.is_none() && !p.dirty));
    }

    #[test]
    fn map_keeps_base_colour() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let mut body = body(2);
        apply_color(&mut body, Some(red));

        apply_texture_map(&mut body, &"leather");

        assert!(body.0.iter().all(|p| p.map == Some("leather")));
        assert!(body.0.iter().all(|p| p.color == Some(red)));
    }
}
