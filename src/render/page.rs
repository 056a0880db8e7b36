use super::markdown::escape;
use super::{Section, View};
use crate::models::ContentVariant;

pub const NO_RESULTS: &str = "No results found.";

const DEFAULT_VIEW: &str = r#"<h2>Your Voice, Your Vote</h2>
<p>Elections shape our daily life. Schools, taxes, roads – it's all on the ballot. Know what's at stake before you go.</p>
<p>Type and select from any location in the United States to see what's on your ticket. Examples:</p>
<ul>
<li>Los Angeles, California (90011)</li>
<li>Chicago, Illinois (60629)</li>
<li>Brooklyn, New York (11226)</li>
</ul>
<p>Get the facts. Be prepared. Vote smart.</p>
"#;

/// Inner HTML of the results area.
pub fn results_html(view: &View) -> String {
    match view {
        View::Loading => "<p class=\"loading\">Loading…</p>\n".to_string(),
        View::Default => DEFAULT_VIEW.to_string(),
        View::Empty => format!("<p>{}</p>\n", NO_RESULTS),
        View::Results(results) => {
            let mut out = String::new();
            for (index, section) in results.sections().iter().enumerate() {
                section_html(&mut out, index, section);
            }
            out
        }
    }
}

/// Complete standalone page around the results area.
pub fn page_html(view: &View, query: Option<&str>) -> String {
    let value = escape(query.unwrap_or_default());
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Ballot Lookup</title>\n</head>\n<body>\n\
         <form class=\"search\"><input id=\"search-input\" name=\"q\" value=\"{}\" autocomplete=\"off\"></form>\n\
         <main id=\"results\">\n{}</main>\n</body>\n</html>\n",
        value,
        results_html(view)
    )
}

fn section_html(out: &mut String, index: usize, section: &Section) {
    let open = if section.expanded { " open" } else { "" };
    out.push_str(&format!(
        "<details class=\"ballot\" data-index=\"{}\"{}>\n",
        index, open
    ));
    out.push_str(&format!("<summary>{}</summary>\n", escape(&section.title())));

    if section.has_switch() {
        out.push_str("<div class=\"view-switch\">");
        for variant in [ContentVariant::Simplified, ContentVariant::Enhanced] {
            let class = if variant == section.active { "tab active" } else { "tab" };
            out.push_str(&format!(
                "<button type=\"button\" class=\"{}\" data-view=\"{}\">{}</button>",
                class,
                variant,
                variant.label()
            ));
        }
        out.push_str("</div>\n");
    }

    out.push_str("<div class=\"ballot-body\">\n");
    out.push_str(&section.body_html());
    out.push_str("</div>\n");

    if let Some(src) = &section.visualization {
        out.push_str(&format!(
            "<iframe class=\"ballot-map\" src=\"{}\" loading=\"lazy\"></iframe>\n",
            escape(src)
        ));
    }

    out.push_str("</details>\n");
}
