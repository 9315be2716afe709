use std::cell::RefCell;
use std::rc::Rc;

use crate::editor::Editor;

/// Canonical copy of the source text that gets submitted.
///
/// Editors write into it on every change; the executor only ever reads it.
#[derive(Debug, Default, Clone)]
pub struct SourceMirror(Rc<RefCell<String>>);

impl SourceMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, text: &str) {
        let mut mirrored = self.0.borrow_mut();
        if *mirrored != text {
            mirrored.clear();
            mirrored.push_str(text);
        }
    }

    /// Forces the mirror to the editor's current text.
    pub fn sync_from(&self, editor: &dyn Editor) {
        self.update(editor.current_text());
    }

    pub fn text(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn is_blank(&self) -> bool {
        self.0.borrow().trim().is_empty()
    }
}
