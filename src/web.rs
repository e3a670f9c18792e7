//! Browser glue: the canvas mount and the page controls.
//!
//! The page provides a `#render-context` container, `.color-swatch`
//! elements whose computed background is the selectable style, and
//! `.model-option` elements carrying a `data-model` attribute.

use anyhow::{Context as _, anyhow};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};
use winit::event_loop::EventLoopProxy;

use crate::{config::ViewerConfig, flow::ViewerEvent, showroom::style::SwatchStyle};

const CONTAINER_ID: &str = "render-context";
const SWATCH_SELECTOR: &str = ".color-swatch";
const MODEL_OPTION_SELECTOR: &str = ".model-option";

fn document() -> anyhow::Result<Document> {
    web_sys::window()
        .context("no window object")?
        .document()
        .context("no document object")
}

fn js_error(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// Create the drawing canvas inside the render container.
pub fn mount_canvas() -> anyhow::Result<HtmlCanvasElement> {
    let document = document()?;
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .with_context(|| format!("no #{CONTAINER_ID} element on the page"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| anyhow!("created element is not a canvas"))?;
    let style = canvas.style();
    style.set_property("width", "100%").map_err(js_error)?;
    style.set_property("height", "100%").map_err(js_error)?;
    style.set_property("display", "block").map_err(js_error)?;
    container.append_child(&canvas).map_err(js_error)?;
    Ok(canvas)
}

fn for_each_element(
    document: &Document,
    selector: &str,
    mut f: impl FnMut(Element) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let nodes = document.query_selector_all(selector).map_err(js_error)?;
    for i in 0..nodes.length() {
        if let Some(element) = nodes.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            f(element)?;
        }
    }
    Ok(())
}

fn on_click(element: &Element, handler: impl FnMut(web_sys::Event) + 'static) -> anyhow::Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    element
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn computed_swatch(element: &Element) -> Option<SwatchStyle> {
    let style = web_sys::window()?.get_computed_style(element).ok()??;
    let background_image = style
        .get_property_value("background-image")
        .ok()
        .filter(|image| !image.is_empty() && image != "none");
    let background_color = style.get_property_value("background-color").ok()?;
    Some(SwatchStyle {
        background_image,
        background_color,
    })
}

/// Wire the swatch and variant controls to the event loop and schedule the
/// default variant selection.
pub fn bind_controls(
    proxy: EventLoopProxy<ViewerEvent>,
    default_model: &str,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let document = document()?;

    let mut swatches = 0;
    for_each_element(&document, SWATCH_SELECTOR, |element| {
        let proxy = proxy.clone();
        let target = element.clone();
        swatches += 1;
        on_click(&element, move |_event| match computed_swatch(&target) {
            Some(style) => {
                if proxy.send_event(ViewerEvent::Swatch(style)).is_err() {
                    log::warn!("Swatch clicked after the viewer stopped");
                }
            }
            None => log::warn!("Swatch has no computed style"),
        })
    })?;

    let mut options = 0;
    for_each_element(&document, MODEL_OPTION_SELECTOR, |element| {
        let proxy = proxy.clone();
        let target = element.clone();
        options += 1;
        on_click(&element, move |_event| {
            let Some(name) = target.get_attribute("data-model") else {
                log::warn!("Model option without a data-model attribute");
                return;
            };
            if proxy.send_event(ViewerEvent::SelectModel(name)).is_err() {
                log::warn!("Model option clicked after the viewer stopped");
            }
        })
    })?;
    log::info!("Bound {} swatches and {} model options", swatches, options);

    schedule_default_selection(proxy, default_model, delay_ms)
}

/// Click `#model-<name>` after `delay_ms`, as if the visitor had chosen it.
fn schedule_default_selection(
    proxy: EventLoopProxy<ViewerEvent>,
    default_model: &str,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let window = web_sys::window().context("no window object")?;
    let id = format!("model-{default_model}");
    let name = default_model.to_string();
    let closure = Closure::wrap(Box::new(move || {
        let option = document()
            .ok()
            .and_then(|document| document.get_element_by_id(&id))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        match option {
            Some(option) => option.click(),
            None => {
                log::warn!("No #{} control, selecting {} directly", id, name);
                let _ = proxy.send_event(ViewerEvent::SelectModel(name.clone()));
            }
        }
    }) as Box<dyn FnMut()>);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            i32::try_from(delay_ms).unwrap_or(i32::MAX),
        )
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    crate::flow::init_logging();
    let config = ViewerConfig::load().map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    crate::flow::run(config).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
