//! Identifiers and chrome shared by every host page implementation.

pub const CONTAINER_ID: &str = "chapter-nav";
pub const HEADER_ID: &str = "chapter-nav-header";
pub const LIST_ID: &str = "chapter-nav-list";
pub const TOGGLE_ID: &str = "chapter-nav-toggle";
pub const JUMP_ID: &str = "chapter-nav-jump";
pub const STYLE_ID: &str = "chapter-nav-style";
pub const ROW_CLASS: &str = "chapter-btn";
pub const COLLAPSED_CLASS: &str = "nav-collapsed";

pub const TITLE: &str = "💬 Questions";
pub const EXPANDED_GLYPH: &str = "▼";
pub const COLLAPSED_GLYPH: &str = "▲";
pub const JUMP_GLYPH: &str = "⤓";

/// Minimal stylesheet; collapsing hides the list through the class rule.
pub const STYLESHEET: &str = "\
#chapter-nav{position:fixed;top:80px;right:16px;width:240px;max-height:60vh;\
display:flex;flex-direction:column;z-index:2147483000;background:#fff;color:#222;\
border:1px solid #ccc;border-radius:8px;font:13px/1.4 sans-serif;box-shadow:0 2px 8px rgba(0,0,0,.15)}\
#chapter-nav-header{display:flex;gap:6px;align-items:center;padding:6px 10px;cursor:pointer;font-weight:600}\
#chapter-nav-header span:first-child{flex:1}\
#chapter-nav-jump{border:none;background:none;cursor:pointer;font-size:14px}\
#chapter-nav-list{overflow-y:auto;padding:4px}\
#chapter-nav.nav-collapsed #chapter-nav-list{display:none}\
.chapter-btn{display:block;width:100%;text-align:left;border:none;background:none;\
padding:4px 6px;cursor:pointer;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}\
.chapter-btn:hover{background:rgba(0,0,0,.06)}";

/// Toggle indicator for the given mode.
pub fn toggle_glyph(collapsed: bool) -> &'static str {
    if collapsed {
        COLLAPSED_GLYPH
    } else {
        EXPANDED_GLYPH
    }
}

/// Static markup of an empty container, used by implementations that build from HTML.
pub fn container_markup() -> String {
    format!(
        "<div id=\"{CONTAINER_ID}\">\
<div id=\"{HEADER_ID}\"><span>{TITLE}</span>\
<button id=\"{JUMP_ID}\" title=\"Jump to latest\">{JUMP_GLYPH}</button>\
<span id=\"{TOGGLE_ID}\">{EXPANDED_GLYPH}</span></div>\
<div id=\"{LIST_ID}\"></div></div>"
    )
}

/// Markup for one row per label.
pub fn rows_markup(labels: &[String]) -> String {
    let mut out = String::new();
    for label in labels {
        out.push_str("<button class=\"");
        out.push_str(ROW_CLASS);
        out.push_str("\">");
        out.push_str(&escape_html(label));
        out.push_str("</button>");
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{rows_markup, toggle_glyph};

    #[test]
    fn row_labels_are_escaped() {
        let markup = rows_markup(&["1. <b>&".to_string()]);
        assert_eq!(
            markup,
            "<button class=\"chapter-btn\">1. &lt;b&gt;&amp;</button>"
        );
    }

    #[test]
    fn glyph_follows_mode() {
        assert_eq!(toggle_glyph(false), "▼");
        assert_eq!(toggle_glyph(true), "▲");
    }
}
