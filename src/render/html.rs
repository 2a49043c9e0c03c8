//! Minimal HTML shell around the call graph.

use crate::hoplog::HopLog;
use crate::render::scene::Scene;
use crate::render::svg::{escape, to_svg};

/// Page showing `secret` above the diagram of `log`.
pub fn render_page(secret: &str, log: &HopLog) -> String {
    let svg = to_svg(&Scene::layout(log));
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<div style="display: flex; flex-direction: column">
<center><h4>{title}</h4></center>
{svg}
</div>
</body>
</html>
"#,
        title = escape(secret),
        svg = svg
    )
}
