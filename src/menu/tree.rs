use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Choose an option: ";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No options assigned";

/// Handle to a menu inside a [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(usize);

/// Wiring mistakes. These are programming errors, surfaced at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu {0:?} does not belong to this tree")]
    UnknownMenu(MenuId),
    #[error("option index {index} is out of bounds for menu {menu:?} with {len} options")]
    OptionOutOfBounds { menu: MenuId, index: usize, len: usize },
}

/// What happens when an option is chosen.
///
/// `C` is the application's command type. Hooks reuse it: a hook is a
/// command the controller runs before the submenu is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<C> {
    /// Nothing bound yet.
    Unbound,
    /// Run `before_show` (if any), then show `menu`.
    SubMenu { menu: MenuId, before_show: Option<C> },
    /// Hand the command to the controller.
    Command(C),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption<C> {
    description: String,
    action: Action<C>,
}

impl<C> MenuOption<C> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: Action::Unbound,
        }
    }

    pub fn with_action(description: impl Into<String>, action: Action<C>) -> Self {
        Self {
            description: description.into(),
            action,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> &Action<C> {
        &self.action
    }

    pub fn set_action(&mut self, action: Action<C>) {
        self.action = action;
    }
}

/// A single node: an ordered option list plus its navigation metadata.
#[derive(Debug, Clone)]
pub struct Menu<C> {
    options: Vec<MenuOption<C>>,
    title: Option<String>,
    empty_message: String,
    parent: Option<MenuId>,
    sub_menus: Vec<MenuId>,
    /// Last selection read from the console, 1-based (0 = back/exit).
    selected: Option<usize>,
}

impl<C> Menu<C> {
    pub fn new(options: Vec<MenuOption<C>>) -> Self {
        Self {
            options,
            title: Some(DEFAULT_TITLE.to_string()),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            parent: None,
            sub_menus: Vec::new(),
            selected: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn options(&self) -> &[MenuOption<C>] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    pub fn sub_menus(&self) -> &[MenuId] {
        &self.sub_menus
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    /// Description of the last selected option, looked up in the current list.
    pub fn selected_description(&self) -> Option<&str> {
        let index = self.selected?.checked_sub(1)?;
        self.options.get(index).map(MenuOption::description)
    }

    /// Lines shown for this menu, numbered against the current option list.
    ///
    /// Returns `None` for an empty menu; the caller prints the empty-message.
    pub fn render(&self) -> Option<Vec<String>> {
        if self.options.is_empty() {
            return None;
        }

        let mut lines = Vec::with_capacity(self.options.len() + 3);
        if let Some(title) = &self.title {
            lines.push(title.clone());
        }
        lines.push(String::new());
        for (i, option) in self.options.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, option.description));
        }
        let zero = if self.parent.is_some() { "Back" } else { "Exit" };
        lines.push(format!("0. {zero}"));
        Some(lines)
    }
}

/// Arena owning every menu of the application.
#[derive(Debug, Clone)]
pub struct MenuTree<C> {
    menus: Vec<Menu<C>>,
}

impl<C> Default for MenuTree<C> {
    fn default() -> Self {
        Self { menus: Vec::new() }
    }
}

impl<C> MenuTree<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, menu: Menu<C>) -> MenuId {
        self.menus.push(menu);
        MenuId(self.menus.len() - 1)
    }

    pub fn get(&self, id: MenuId) -> Result<&Menu<C>, MenuError> {
        self.menus.get(id.0).ok_or(MenuError::UnknownMenu(id))
    }

    fn get_mut(&mut self, id: MenuId) -> Result<&mut Menu<C>, MenuError> {
        self.menus.get_mut(id.0).ok_or(MenuError::UnknownMenu(id))
    }

    fn option_mut(
        &mut self,
        id: MenuId,
        index: usize,
    ) -> Result<&mut MenuOption<C>, MenuError> {
        let menu = self.get_mut(id)?;
        let len = menu.options.len();
        menu.options.get_mut(index).ok_or(MenuError::OptionOutOfBounds {
            menu: id,
            index,
            len,
        })
    }

    /// Bind option `index` (0-based) of `menu` to open `child`.
    ///
    /// The child's parent becomes `parent` when given, otherwise `menu`.
    pub fn add_sub_menu(
        &mut self,
        menu: MenuId,
        index: usize,
        child: MenuId,
        before_show: Option<C>,
        parent: Option<MenuId>,
    ) -> Result<(), MenuError> {
        // Validate the child before touching the option so a bad id leaves no trace.
        self.get(child)?;
        self.option_mut(menu, index)?.set_action(Action::SubMenu {
            menu: child,
            before_show,
        });
        self.get_mut(child)?.parent = Some(parent.unwrap_or(menu));

        let owner = self.get_mut(menu)?;
        if !owner.sub_menus.contains(&child) {
            owner.sub_menus.push(child);
        }
        Ok(())
    }

    pub fn bind_action(
        &mut self,
        menu: MenuId,
        index: usize,
        action: Action<C>,
    ) -> Result<(), MenuError> {
        self.option_mut(menu, index)?.set_action(action);
        Ok(())
    }

    /// Replace the whole option list. Bindings on the old list are gone.
    pub fn set_options_list(
        &mut self,
        menu: MenuId,
        options: Vec<MenuOption<C>>,
    ) -> Result<(), MenuError> {
        let menu = self.get_mut(menu)?;
        menu.options = options;
        menu.selected = None;
        Ok(())
    }

    pub fn add_option(&mut self, menu: MenuId, option: MenuOption<C>) -> Result<(), MenuError> {
        self.get_mut(menu)?.options.push(option);
        Ok(())
    }

    pub fn set_title(&mut self, menu: MenuId, title: impl Into<String>) -> Result<(), MenuError> {
        self.get_mut(menu)?.title = Some(title.into());
        Ok(())
    }

    pub fn set_empty_message(
        &mut self,
        menu: MenuId,
        message: impl Into<String>,
    ) -> Result<(), MenuError> {
        self.get_mut(menu)?.empty_message = message.into();
        Ok(())
    }

    pub fn set_parent_menu(
        &mut self,
        menu: MenuId,
        parent: Option<MenuId>,
    ) -> Result<(), MenuError> {
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        self.get_mut(menu)?.parent = parent;
        Ok(())
    }

    pub(crate) fn select(&mut self, menu: MenuId, selection: usize) -> Result<(), MenuError> {
        self.get_mut(menu)?.selected = Some(selection);
        Ok(())
    }

    pub fn selected_description(&self, menu: MenuId) -> Result<Option<&str>, MenuError> {
        Ok(self.get(menu)?.selected_description())
    }
}
