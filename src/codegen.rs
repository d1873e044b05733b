use crate::extract::Fragments;

/// Builds the replacement module. The `styleInject` call only happens inside
/// the exported `styles()` accessor, guarded by `hasRun`, so a consumer that
/// never calls `styles()` leaves the whole module unreferenced.
pub fn render(fragments: &Fragments) -> String {
    let Fragments {
        css,
        class_map,
        helper_src,
    } = fragments;
    format!(
        "import styleInject from {helper_src};
var cssMap = {class_map}
var hasRun;
var styles = function styles() {{
  if (!hasRun) {{
    hasRun = true;
    styleInject({css});
  }}
  return cssMap;
}}

export default styles"
    )
}
