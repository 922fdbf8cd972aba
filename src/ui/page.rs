//! The hosting page the board renders into.
//!
//! [`Page`] lists the contract points the board needs: a status area for the
//! loading and error indicators, the card grid, the category and tag control
//! bars, the search input and the detail modal. Implementations treat a
//! missing contract point as a silent no-op; only a missing grid turns
//! rendering off altogether.

use crate::util::escape_html;

/// Contract points of the hosting page.
pub trait Page {
    /// False when the page has no grid container; nothing is rendered then.
    fn has_grid(&self) -> bool;
    fn has_search_input(&self) -> bool;
    fn has_modal(&self) -> bool;

    fn set_loading(&mut self, visible: bool);
    /// Shows `Some(message)` in the error indicator, or hides it.
    fn set_error(&mut self, message: Option<&str>);

    fn set_grid(&mut self, html: &str);
    fn set_category_controls(&mut self, html: &str);
    fn set_tag_controls(&mut self, html: &str);
    fn set_search_value(&mut self, value: &str);

    fn show_modal(&mut self, html: &str);
    fn hide_modal(&mut self);
    fn is_modal_open(&self) -> bool;
    /// Suppresses background scrolling while the modal is open.
    fn set_scroll_locked(&mut self, locked: bool);
}

/// Loading and error indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusArea {
    pub loading: bool,
    pub error: Option<String>,
}

/// The detail overlay with its backdrop and close control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modal {
    pub open: bool,
    pub content: String,
}

/// In-memory page. Each container is optional so partial layouts can be
/// modelled; [`StaticPage::to_document`] serializes the current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPage {
    pub status: Option<StatusArea>,
    pub grid: Option<String>,
    pub category_controls: Option<String>,
    pub tag_controls: Option<String>,
    pub search_input: Option<String>,
    pub modal: Option<Modal>,
    pub scroll_locked: bool,
}

impl StaticPage {
    /// A page with every contract point present and empty.
    pub fn complete() -> Self {
        Self {
            status: Some(StatusArea::default()),
            grid: Some(String::new()),
            category_controls: Some(String::new()),
            tag_controls: Some(String::new()),
            search_input: Some(String::new()),
            modal: Some(Modal::default()),
            scroll_locked: false,
        }
    }

    /// Serializes the page as a standalone HTML document.
    pub fn to_document(&self, title: &str) -> String {
        let mut body = String::new();

        if let Some(status) = &self.status {
            body.push_str(&format!(
                "<div class=\"insights-status\"><p class=\"insights-loading\"{}>Loading insights…</p>",
                hidden_attr(!status.loading)
            ));
            match &status.error {
                Some(message) => body.push_str(&format!(
                    "<p class=\"insights-error\" role=\"alert\">{}</p>",
                    escape_html(message)
                )),
                None => body.push_str("<p class=\"insights-error\" role=\"alert\" hidden></p>"),
            }
            body.push_str("</div>\n");
        }

        if let Some(value) = &self.search_input {
            body.push_str(&format!(
                "<input type=\"search\" class=\"insights-search\" placeholder=\"Search insights\" value=\"{}\">\n",
                escape_html(value)
            ));
        }
        if let Some(controls) = &self.category_controls {
            body.push_str(&format!("<nav class=\"insights-categories\">{controls}</nav>\n"));
        }
        if let Some(controls) = &self.tag_controls {
            body.push_str(&format!("<nav class=\"insights-tags\">{controls}</nav>\n"));
        }
        if let Some(grid) = &self.grid {
            body.push_str(&format!("<section class=\"insights-grid\">{grid}</section>\n"));
        }
        if let Some(modal) = &self.modal {
            body.push_str(&format!(
                "<div class=\"insight-modal\" role=\"dialog\" aria-modal=\"true\"{}>\
                 <div class=\"insight-modal__backdrop\"></div>\
                 <button type=\"button\" class=\"insight-modal__close\" aria-label=\"Close\">×</button>\
                 <div class=\"insight-modal__content\">{}</div></div>\n",
                hidden_attr(!modal.open),
                modal.content
            ));
        }

        let body_class = if self.scroll_locked {
            " class=\"modal-open\""
        } else {
            ""
        };

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body{}>\n{}</body>\n</html>\n",
            escape_html(title),
            body_class,
            body
        )
    }
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden {
        " hidden"
    } else {
        ""
    }
}

impl Page for StaticPage {
    fn has_grid(&self) -> bool {
        self.grid.is_some()
    }

    fn has_search_input(&self) -> bool {
        self.search_input.is_some()
    }

    fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    fn set_loading(&mut self, visible: bool) {
        if let Some(status) = &mut self.status {
            status.loading = visible;
        }
    }

    fn set_error(&mut self, message: Option<&str>) {
        if let Some(status) = &mut self.status {
            status.error = message.map(str::to_string);
        }
    }

    fn set_grid(&mut self, html: &str) {
        if let Some(grid) = &mut self.grid {
            html.clone_into(grid);
        }
    }

    fn set_category_controls(&mut self, html: &str) {
        if let Some(controls) = &mut self.category_controls {
            html.clone_into(controls);
        }
    }

    fn set_tag_controls(&mut self, html: &str) {
        if let Some(controls) = &mut self.tag_controls {
            html.clone_into(controls);
        }
    }

    fn set_search_value(&mut self, value: &str) {
        if let Some(input) = &mut self.search_input {
            value.clone_into(input);
        }
    }

    fn show_modal(&mut self, html: &str) {
        if let Some(modal) = &mut self.modal {
            html.clone_into(&mut modal.content);
            modal.open = true;
        }
    }

    fn hide_modal(&mut self) {
        if let Some(modal) = &mut self.modal {
            modal.open = false;
        }
    }

    fn is_modal_open(&self) -> bool {
        self.modal.as_ref().is_some_and(|m| m.open)
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_page_has_every_container() {
        let page = StaticPage::complete();
        assert!(page.has_grid());
        assert!(page.has_search_input());
        assert!(page.has_modal());
        assert!(!page.is_modal_open());
    }

    #[test]
    fn test_missing_containers_are_noops() {
        let mut page = StaticPage::default();
        page.set_loading(true);
        page.set_error(Some("boom"));
        page.set_grid("<p>x</p>");
        page.show_modal("<p>x</p>");
        assert_eq!(page, StaticPage::default());
        assert!(!page.is_modal_open());
    }

    #[test]
    fn test_modal_show_and_hide() {
        let mut page = StaticPage::complete();
        page.show_modal("<p>detail</p>");
        assert!(page.is_modal_open());
        page.hide_modal();
        assert!(!page.is_modal_open());
        page.hide_modal();
        assert!(!page.is_modal_open());
    }

    #[test]
    fn test_document_escapes_error_and_search_value() {
        let mut page = StaticPage::complete();
        page.set_error(Some("<b>bad</b>"));
        page.set_search_value("\"quoted\"");
        let doc = page.to_document("Insights");
        assert!(doc.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(doc.contains("value=\"&quot;quoted&quot;\""));
        assert!(doc.contains("class=\"insight-modal\" role=\"dialog\" aria-modal=\"true\" hidden"));
    }

    #[test]
    fn test_document_marks_scroll_lock() {
        let mut page = StaticPage::complete();
        page.set_scroll_locked(true);
        assert!(page.to_document("Insights").contains("<body class=\"modal-open\">"));
    }
}
