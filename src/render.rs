//! Presentation: card markup as a pure function of `PreviewState`.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::i18n::{Strings, KEY_SEARCH, KEY_SEARCH_PLACEHOLDER, KEY_TITLE};
use crate::models::PreviewState;
use crate::refresh::image_is_missing;

/// Render the card fragment. While `loading` is set only the spinner is
/// shown; otherwise the image, search box, title, description and link.
pub fn render_card(state: &PreviewState, strings: &Strings) -> String {
    let mut html = String::with_capacity(512);
    html.push_str(r#"<div class="wrapper">"#);

    if state.loading {
        html.push_str(r#"<div class="loader"></div>"#);
    } else {
        render_content(&mut html, state, strings);
    }

    html.push_str("<slot></slot></div>");
    html
}

fn render_content(html: &mut String, state: &PreviewState, strings: &Strings) {
    html.push_str(r#"<div class="card-content">"#);

    html.push_str(r#"<img id="myimage""#);
    if !image_is_missing(&state.image_link) {
        let _ = write!(html, r#" src="{}""#, attr(&state.image_link));
    }
    let _ = write!(
        html,
        r#" alt="{}: {}" loading="lazy" width="100%">"#,
        attr(strings.get(KEY_TITLE)),
        attr(&state.title)
    );

    html.push_str(r#"<div class="intro"><div class="link-search">"#);
    let _ = write!(
        html,
        r#"<input id="input" placeholder="{}"><button id="search">{}</button>"#,
        attr(strings.get(KEY_SEARCH_PLACEHOLDER)),
        text(strings.get(KEY_SEARCH))
    );
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<h3>{}</h3><p>{}</p><p><br><a href="{}" target="_blank">{}</a></p>"#,
        text(&state.title),
        text(&state.description),
        attr(&state.web_link),
        text(&state.web_link)
    );

    html.push_str("</div></div>");
}
