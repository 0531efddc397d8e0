use crate::Host;

/// Class toggled on the element being dragged; hides it while the native drag image follows
/// the pointer.
pub const DRAGGING_CLASS: &str = "drag-list__dragging";

/// Id of the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "drag-list-styles";

pub const DRAGGING_STYLES: &str = "
.drag-list__dragging {
  opacity: 0;
  background-color: transparent;
}
";

/// Injects the dragging stylesheet once per document.
///
/// Returns `true` if this call inserted it.
pub fn inject_styles<H: Host>(host: &mut H) -> bool {
    host.inject_stylesheet(STYLE_ELEMENT_ID, DRAGGING_STYLES)
}
