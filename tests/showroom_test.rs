use cgmath::{InnerSpace, Point3};
use flow_showroom::showroom::{
    Input,
    style::{Rgb, Selection, SwatchStyle},
    updater::TextureRequest,
};

use crate::common::test_utils::{MockFragment, Scene};

mod common;

const CARBON: &str = "url(\"https://hadi-rgb.github.io/viewerbucket/textures/carbon.png\")";
const CARBON_URL: &str = "https://hadi-rgb.github.io/viewerbucket/textures/carbon.png";

fn red() -> Rgb {
    Rgb::new(1.0, 0.0, 0.0)
}

#[test]
fn selecting_porsche_frames_camera_and_swaps_visibility() {
    let mut scene = Scene::loaded();

    assert!(scene.select_model("porsche"));

    assert_eq!(scene.camera.position, Point3::new(0.0, 15.0, 15.0));
    assert_eq!(scene.camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(scene.controller.min_distance, 20.0);
    assert_eq!(scene.controller.max_distance, 50.0);
    assert!(scene.fragment("porsche").visible);
    assert!(!scene.fragment("mclaren").visible);
    assert_eq!(scene.showroom.appearance().active_model_name(), "porsche");

    assert!(scene.select_model("mclaren"));
    assert_eq!(scene.camera.position, Point3::new(0.0, 3.0, 3.0));
    assert!(scene.fragment("mclaren").visible);
    assert!(!scene.fragment("porsche").visible);
}

#[test]
fn unknown_variant_keeps_camera_but_hides_everything() {
    let mut scene = Scene::loaded();
    scene.select_model("porsche");

    assert!(!scene.select_model("mercedes"));

    assert_eq!(scene.camera.position, Point3::new(0.0, 15.0, 15.0));
    assert_eq!(scene.controller.min_distance, 20.0);
    assert!(!scene.fragment("porsche").visible);
    assert!(!scene.fragment("mclaren").visible);
    assert_eq!(scene.showroom.appearance().active_model_name(), "mercedes");
}

#[test]
fn colour_swatch_repaints_active_variant_only() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");

    let request = scene
        .showroom
        .select_swatch(&SwatchStyle::color("rgb(255, 0, 0)"));

    assert_eq!(request, None);
    assert!(scene.fragment("mclaren").all_colored(red()));
    assert!(scene.fragment("porsche").surfaces.iter().all(|s| s.color.is_none()));
}

#[test]
fn texture_swatch_is_fetched_then_applied() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");

    let request = scene
        .showroom
        .select_swatch(&SwatchStyle::image(CARBON))
        .expect("a texture request for the active variant");
    assert_eq!(request.url, CARBON_URL);
    assert_eq!(request.model, "mclaren");

    assert!(
        scene
            .showroom
            .texture_loaded(&request, "carbon".to_string())
    );
    assert!(scene.fragment("mclaren").all_mapped("carbon"));
    assert!(scene.fragment("porsche").unmapped());
}

#[test]
fn colour_after_texture_clears_the_map() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");
    let request = scene
        .showroom
        .select_swatch(&SwatchStyle::image(CARBON))
        .unwrap();
    scene
        .showroom
        .texture_loaded(&request, "carbon".to_string());

    scene.showroom.select_swatch(&SwatchStyle::color("#ff0000"));

    let mclaren = scene.fragment("mclaren");
    assert!(mclaren.unmapped());
    assert!(mclaren.all_colored(red()));
    assert!(mclaren.surfaces.iter().all(|s| s.updates >= 2));
}

#[test]
fn stale_texture_is_dropped_after_newer_colour() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");
    let request = scene
        .showroom
        .select_swatch(&SwatchStyle::image(CARBON))
        .unwrap();

    scene.showroom.select_swatch(&SwatchStyle::color("#ff0000"));
    let applied = scene
        .showroom
        .texture_loaded(&request, "carbon".to_string());

    assert!(!applied);
    let mclaren = scene.fragment("mclaren");
    assert!(mclaren.unmapped());
    assert!(mclaren.all_colored(red()));
}

#[test]
fn out_of_order_textures_keep_the_latest_selection() {
    let mut scene = Scene::loaded();
    scene.select_model("porsche");
    let first = scene
        .showroom
        .select_swatch(&SwatchStyle::image(CARBON))
        .unwrap();
    let second = scene
        .showroom
        .select(Selection::Texture("textures/leather.jpg".to_string()))
        .unwrap();
    assert!(second.sequence > first.sequence);

    assert!(scene.showroom.texture_loaded(&second, "leather".to_string()));
    assert!(!scene.showroom.texture_loaded(&first, "carbon".to_string()));
    assert!(scene.fragment("porsche").all_mapped("leather"));
}

#[test]
fn texture_for_unregistered_variant_is_ignored() {
    let mut scene = Scene::loaded();
    let request = TextureRequest {
        url: CARBON_URL.to_string(),
        model: "mercedes".to_string(),
        sequence: 1,
    };
    assert!(!scene.showroom.texture_loaded(&request, "carbon".to_string()));
}

#[test]
fn selection_before_any_load_waits_for_the_variant() {
    let mut scene = Scene::new();
    scene.select_model("mclaren");

    assert_eq!(scene.showroom.select(Selection::Color(red())), None);
    assert_eq!(scene.showroom.appearance().selected_color(), Some(red()));

    let request = scene
        .showroom
        .model_loaded("mclaren", MockFragment::with_meshes(4));
    assert_eq!(request, None);
    let mclaren = scene.fragment("mclaren");
    assert!(!mclaren.visible);
    assert!(mclaren.all_colored(red()));
}

#[test]
fn late_load_receives_the_selected_texture() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");
    let selected = scene
        .showroom
        .select_swatch(&SwatchStyle::image(CARBON))
        .unwrap();

    let request = scene
        .showroom
        .model_loaded("mercedes", MockFragment::with_meshes(1))
        .expect("the late variant needs the current texture");

    assert_eq!(request.url, CARBON_URL);
    assert_eq!(request.model, "mercedes");
    assert_eq!(request.sequence, selected.sequence);
    assert!(!scene.fragment("mercedes").visible);
    assert!(scene.showroom.texture_loaded(&request, "carbon".to_string()));
    assert!(scene.fragment("mercedes").all_mapped("carbon"));
}

#[test]
fn late_load_of_the_selected_variant_stays_hidden() {
    let mut scene = Scene::new();
    scene.select_model("porsche");
    scene
        .showroom
        .model_loaded("porsche", MockFragment::with_meshes(2));
    assert!(!scene.fragment("porsche").visible);

    scene.select_model("porsche");
    assert!(scene.fragment("porsche").visible);
}

#[test]
fn duplicate_registration_is_refused() {
    let mut scene = Scene::new();
    scene
        .showroom
        .model_loaded("mclaren", MockFragment::with_meshes(3));

    let request = scene
        .showroom
        .model_loaded("mclaren", MockFragment::with_meshes(7));

    assert_eq!(request, None);
    assert_eq!(scene.showroom.registry().len(), 1);
    assert_eq!(scene.fragment("mclaren").surfaces.len(), 3);
}

#[test]
fn invalid_swatch_is_ignored() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");
    scene.showroom.select_swatch(&SwatchStyle::color("#ff0000"));
    let sequence = scene.showroom.appearance().sequence();

    let request = scene
        .showroom
        .select_swatch(&SwatchStyle::color("definitely-not-a-colour"));

    assert_eq!(request, None);
    assert_eq!(scene.showroom.appearance().sequence(), sequence);
    assert_eq!(scene.showroom.appearance().selected_color(), Some(red()));
    assert!(scene.fragment("mclaren").all_colored(red()));
}

#[test]
fn frame_driver_runs_before_any_model_arrives() {
    let mut scene = Scene::new();
    assert!(scene.showroom.frame_driver().is_running());
    scene.camera.position = Point3::new(0.0, -3.0, 10.0);
    scene.controller.rotate(200.0, 0.0);
    let before = scene.camera.position;

    assert!(scene.advance());

    assert_eq!(scene.camera.position.y, 1.0);
    assert_ne!(scene.camera.position.x, before.x);
    assert_eq!(scene.showroom.frame_driver().frames(), 1);
}

#[test]
fn frame_driver_keeps_running_through_loads_until_shutdown() {
    let mut scene = Scene::new();
    scene
        .showroom
        .model_loaded("porsche", MockFragment::with_meshes(1));
    scene
        .showroom
        .model_loaded("mclaren", MockFragment::with_meshes(1));
    assert!(scene.showroom.frame_driver().is_running());
    assert!(scene.advance());

    scene.showroom.shutdown();
    assert!(!scene.advance());
    assert!(!scene.showroom.frame_driver().is_running());
}

#[test]
fn input_held_during_startup_replays_in_order() {
    let held = vec![
        Input::Swatch(SwatchStyle::color("#ff0000")),
        Input::SelectModel("porsche".to_string()),
        Input::Swatch(SwatchStyle::image(CARBON)),
    ];
    let mut scene = Scene::new();
    let requests: Vec<_> = held
        .into_iter()
        .filter_map(|input| {
            scene
                .showroom
                .handle_input(input, &mut scene.camera, &mut scene.controller)
        })
        .collect();

    // nothing is registered yet, so no fetch is needed
    assert!(requests.is_empty());
    assert_eq!(scene.showroom.appearance().active_model_name(), "porsche");
    assert_eq!(scene.showroom.appearance().selected_texture(), Some(CARBON_URL));
    assert_eq!(scene.camera.position, Point3::new(0.0, 15.0, 15.0));
    assert_eq!(scene.controller.min_distance, 20.0);

    let request = scene
        .showroom
        .model_loaded("porsche", MockFragment::with_meshes(2))
        .expect("the replayed texture reaches the late load");
    assert_eq!(request.url, CARBON_URL);
}

#[test]
fn frames_keep_the_camera_above_the_floor() {
    let mut scene = Scene::new();
    scene
        .showroom
        .model_loaded("mclaren", MockFragment::with_meshes(1));
    scene.camera.position = Point3::new(0.0, -3.0, 10.0);

    scene.advance();

    assert_eq!(scene.camera.position.y, 1.0);
}

#[test]
fn first_frame_pulls_mclaren_camera_out_to_min_distance() {
    let mut scene = Scene::loaded();
    scene.select_model("mclaren");

    scene.advance();

    let distance = (scene.camera.position - scene.camera.target).magnitude();
    assert!((distance - 5.0).abs() < 1e-4, "distance {distance}");
    assert!(scene.camera.position.y >= 1.0);
}
