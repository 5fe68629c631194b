/// Modifier keys held during a pointer or key event
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.meta || self.alt
    }
}

/// Where the pointer or keyboard focus currently is
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// Inside a rich-text or code editing surface
    EditableContent,
    /// Anywhere else: block chrome, page background
    #[default]
    Chrome,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer-down as seen by the selection engine
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerDown {
    pub button: PointerButton,
    pub modifiers: Modifiers,
    pub target: FocusTarget,
}

impl PointerDown {
    pub fn primary() -> Self {
        Self {
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            target: FocusTarget::Chrome,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Escape,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub focus: FocusTarget,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            focus: FocusTarget::Chrome,
        }
    }

    pub fn in_editable(mut self) -> Self {
        self.focus = FocusTarget::EditableContent;
        self
    }
}
