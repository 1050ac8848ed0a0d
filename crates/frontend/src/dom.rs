use base64::Engine as _;
use framecompare_shared::controls::TriState;
use framecompare_shared::models::EntityRef;
use framecompare_shared::tooltip::Size;
use wasm_bindgen::JsCast;

/// Element id of a category's group checkbox.
pub fn category_checkbox_id(key: &str) -> String {
    format!("category-{}", key)
}

/// Guess an image MIME type from a file name. Unknown extensions fall back
/// to a generic binary type and will fail to decode as an image.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// The diagram entity under a viewport point, via the `data-entity` attribute.
pub fn entity_at(client_x: f64, client_y: f64) -> Option<EntityRef> {
    let document = web_sys::window()?.document()?;
    let hit = document.element_from_point(client_x as f32, client_y as f32)?;
    let group = hit.closest("[data-entity]").ok()??;
    EntityRef::parse_attr(&group.get_attribute("data-entity")?)
}

pub fn element_size(id: &str) -> Option<Size> {
    let document = web_sys::window()?.document()?;
    let rect = document.get_element_by_id(id)?.get_bounding_client_rect();
    Some(Size {
        width: rect.width(),
        height: rect.height(),
    })
}

pub fn viewport_size() -> Option<Size> {
    let window = web_sys::window()?;
    Some(Size {
        width: window.inner_width().ok()?.as_f64()?,
        height: window.inner_height().ok()?.as_f64()?,
    })
}

/// Push a tri-state into a native checkbox. `indeterminate` has no HTML
/// attribute, so it can only be set through the DOM property.
pub fn sync_tri_state(id: &str, state: TriState) {
    let Some(input) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<web_sys::HtmlInputElement>().ok())
    else {
        return;
    };
    input.set_checked(state.checked());
    input.set_indeterminate(state.indeterminate());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for("frame.JPG"), "image/jpeg");
        assert_eq!(mime_for("a.b.png"), "image/png");
        assert_eq!(mime_for("still.webp"), "image/webp");
    }

    #[test]
    fn test_mime_for_unknown_extension() {
        assert_eq!(mime_for("notes.txt"), "application/octet-stream");
        assert_eq!(mime_for("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", &[0, 1, 2]), "data:image/png;base64,AAEC");
        assert_eq!(data_url("image/gif", &[]), "data:image/gif;base64,");
    }

    #[test]
    fn test_category_checkbox_id() {
        assert_eq!(category_checkbox_id("medium-format"), "category-medium-format");
    }
}
