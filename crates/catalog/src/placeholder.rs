use std::sync::LazyLock;

use base64::Engine as _;

const FALLBACK_SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 400'>\
<defs><linearGradient id='g' x1='0' x2='1' y1='0' y2='1'>\
<stop offset='0%' stop-color='#eff6ff'/><stop offset='100%' stop-color='#e0f2fe'/>\
</linearGradient></defs>\
<rect width='1200' height='400' fill='url(#g)'/>\
<g fill='none' stroke='#2563eb' stroke-width='2' opacity='0.35'>\
<path d='M0,260 Q200,180 400,230 T800,220 T1200,240'/>\
<path d='M0,300 Q250,260 500,290 T1000,280 T1200,300'/>\
</g>\
<text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' font-family='system-ui, sans-serif' font-size='28' fill='#1f2937'>Map preview</text>\
</svg>";

static FALLBACK_DATA_URI: LazyLock<String> = LazyLock::new(|| {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(FALLBACK_SVG)
    )
});

/// Inline placeholder graphic used whenever a thumbnail cannot be shown.
pub fn placeholder_data_uri() -> &'static str {
    FALLBACK_DATA_URI.as_str()
}

/// Resolve the image to display for a thumbnail reference.
///
/// An empty reference, or one whose load has already failed, yields the
/// placeholder. This never errors.
pub fn thumbnail_or_placeholder(thumb: &str, load_failed: bool) -> &str {
    if load_failed || thumb.trim().is_empty() {
        placeholder_data_uri()
    } else {
        thumb
    }
}
