//! HTTP handlers: pages and JSON API.

pub mod batch;
pub mod faq;
pub mod home;
pub mod predict;
pub mod targets;

/// Shared page chrome: nav bar, inline stylesheet, content slot.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} — Inhibryx</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f5f7fa; color: #1d2733; }}
        nav {{ background: #14365d; padding: 0.6rem 1.4rem; }}
        nav a {{ color: #dce7f5; text-decoration: none; margin-right: 1.4rem; font-weight: 600; }}
        nav a:hover {{ color: #ffffff; }}
        main {{ max-width: 860px; margin: 2rem auto; padding: 0 1rem; }}
        .card {{ background: #fff; border-radius: 8px; padding: 1.4rem; margin-bottom: 1.2rem;
                 box-shadow: 0 1px 3px rgba(20, 54, 93, 0.12); }}
        .error {{ background: #fdecec; border-left: 4px solid #c0392b; padding: 0.8rem 1rem; }}
        .notice {{ background: #fdf6e3; border-left: 4px solid #b58900; padding: 0.8rem 1rem; }}
        label {{ display: block; margin: 0.7rem 0 0.25rem; font-weight: 600; }}
        input[type=text], select {{ width: 100%; padding: 0.45rem; border: 1px solid #b9c5d3; border-radius: 4px; }}
        button {{ margin-top: 1rem; background: #14365d; color: #fff; border: 0; padding: 0.55rem 1.3rem;
                  border-radius: 4px; cursor: pointer; font-size: 1rem; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ text-align: left; padding: 0.45rem 0.6rem; border-bottom: 1px solid #e3e9f0; }}
        .mono {{ font-family: ui-monospace, monospace; font-size: 0.9rem; }}
    </style>
</head>
<body>
<nav>
    <a href="/">Inhibryx</a>
    <a href="/predict">Single predictor</a>
    <a href="/batch">Batch predictor</a>
    <a href="/faq">FAQ</a>
</nav>
<main>
{body}
</main>
</body>
</html>"##,
        title = title,
        body = body
    )
}

/// Minimal HTML escaping for user-supplied strings interpolated into pages.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
