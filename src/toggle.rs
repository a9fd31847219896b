use std::collections::BTreeSet;

pub const GROUP_CLASS: &str = "box";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Element id of the `<option>`; the placeholder option has none.
    pub id: Option<String>,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            label: label.to_string(),
        }
    }

    pub fn placeholder(label: &str) -> Self {
        Self {
            id: None,
            label: label.to_string(),
        }
    }
}

/// A type selector and its current choice.
#[derive(Debug, Clone)]
pub struct TypeSelector {
    pub name: &'static str,
    pub options: Vec<SelectOption>,
    pub selected: Option<usize>,
}

impl TypeSelector {
    pub fn new(name: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            name,
            options,
            selected: None,
        }
    }

    /// Selects the option whose id matches; unknown values select nothing.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.and_then(|id| {
            self.options
                .iter()
                .position(|option| option.id.as_deref() == Some(id))
        });
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.options.get(index))
            .and_then(|option| option.id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelElement {
    pub classes: BTreeSet<String>,
    pub visible: bool,
}

impl PanelElement {
    pub fn new(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|class| class.to_string()).collect(),
            visible: true,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentPanel {
    pub elements: Vec<PanelElement>,
    pub common_fields_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPlan {
    pub show_class: Option<String>,
    pub common_fields: Option<bool>,
}

impl VisibilityPlan {
    pub fn apply(&self, panel: &mut ContentPanel) {
        for element in &mut panel.elements {
            match &self.show_class {
                Some(class) if element.has_class(class) => element.visible = true,
                _ if element.has_class(GROUP_CLASS) => element.visible = false,
                _ => {}
            }
        }
        if let Some(visible) = self.common_fields {
            panel.common_fields_visible = visible;
        }
    }
}

/// Shows the option group matching the selected option's id and hides its siblings.
#[derive(Debug, Clone, Copy)]
pub struct ContentToggle {
    pub has_common_fields: bool,
}

impl ContentToggle {
    pub fn new(has_common_fields: bool) -> Self {
        Self { has_common_fields }
    }

    pub fn plan(&self, selected_id: Option<&str>) -> VisibilityPlan {
        let show_class = selected_id
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let common_fields = self.has_common_fields.then_some(show_class.is_some());
        VisibilityPlan {
            show_class,
            common_fields,
        }
    }

    /// Brings the panel in line with the selector's current value.
    pub fn on_change(&self, selector: &TypeSelector, panel: &mut ContentPanel) {
        self.plan(selector.selected_id()).apply(panel);
    }
}

pub fn database_selector() -> TypeSelector {
    TypeSelector::new(
        "databaseType",
        vec![
            SelectOption::placeholder("Choose database type"),
            SelectOption::new("postgres", "PostgreSQL"),
        ],
    )
}

pub fn storage_selector() -> TypeSelector {
    TypeSelector::new(
        "storageType",
        vec![
            SelectOption::placeholder("Choose storage type"),
            SelectOption::new("dropbox", "Dropbox"),
            SelectOption::new("localFileSystem", "Local File System"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ContentPanel {
        ContentPanel {
            elements: vec![
                PanelElement::new(&["box", "mysql"]),
                PanelElement::new(&["box", "postgres"]),
                PanelElement::new(&["box", "mysql", "wide"]),
                PanelElement::new(&["hint"]),
            ],
            common_fields_visible: false,
        }
    }

    fn visible(panel: &ContentPanel) -> Vec<bool> {
        panel.elements.iter().map(|element| element.visible).collect()
    }

    #[test]
    fn selecting_an_option_shows_only_its_group() {
        let mut panel = panel();
        ContentToggle::new(true).plan(Some("mysql")).apply(&mut panel);
        assert_eq!(visible(&panel), vec![true, false, true, true]);
        assert!(panel.common_fields_visible);
    }

    #[test]
    fn no_selection_hides_every_box_and_common_fields() {
        let mut panel = panel();
        panel.common_fields_visible = true;
        ContentToggle::new(true).plan(None).apply(&mut panel);
        assert_eq!(visible(&panel), vec![false, false, false, true]);
        assert!(!panel.common_fields_visible);
    }

    #[test]
    fn toggle_without_common_block_leaves_it_alone() {
        let mut panel = panel();
        panel.common_fields_visible = true;
        let toggle = ContentToggle::new(false);
        assert_eq!(toggle.plan(None).common_fields, None);
        toggle.plan(None).apply(&mut panel);
        assert!(panel.common_fields_visible);
    }

    #[test]
    fn selector_change_drives_the_panel() {
        let mut selector = storage_selector();
        let mut panel = ContentPanel {
            elements: vec![
                PanelElement::new(&["box", "dropbox"]),
                PanelElement::new(&["box", "localFileSystem"]),
            ],
            common_fields_visible: false,
        };
        let toggle = ContentToggle::new(true);

        selector.select(Some("localFileSystem"));
        toggle.on_change(&selector, &mut panel);
        assert_eq!(visible(&panel), vec![false, true]);

        selector.select(Some("ftp"));
        assert_eq!(selector.selected_id(), None);
        toggle.on_change(&selector, &mut panel);
        assert_eq!(visible(&panel), vec![false, false]);
        assert!(!panel.common_fields_visible);
    }
}
