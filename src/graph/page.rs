//! HTML documents for OneNote page creation.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Build the HTML body OneNote expects when creating a page.
///
/// The title is used both as the page title and as the top heading. `parent` is an
/// optional `(title, url)` link rendered above the content.
pub fn page_html(
    title: &str,
    content: &str,
    parent: Option<(&str, Option<&str>)>,
    created: DateTime<Utc>,
) -> String {
    let title = encode_text(title);

    let mut body = format!("<h1>{}</h1>\n", title);
    if let Some((parent_title, parent_url)) = parent {
        let parent_title = encode_text(parent_title);
        match parent_url {
            Some(url) => body.push_str(&format!(
                "<p>Part of <a href=\"{}\">{}</a></p>\n",
                encode_double_quoted_attribute(url),
                parent_title
            )),
            None => body.push_str(&format!("<p>Part of {}</p>\n", parent_title)),
        }
    }
    if !content.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", encode_text(content)));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{}</title>\n<meta name=\"created\" content=\"{}\" />\n</head>\n<body>\n{}</body>\n</html>\n",
        title,
        created.to_rfc3339(),
        body
    )
}
