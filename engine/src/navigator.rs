//! "Jump to next/previous change" cursor.

use serde::{Deserialize, Serialize};

/// Cursor over an ordered list of change-section line indices.
///
/// Every move clamps to the list bounds. Moving past either end keeps the
/// current position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NavigatorState")]
pub struct ChangeNavigator {
    sections: Vec<usize>,
    position: Option<usize>,
}

/// Wire form of [`ChangeNavigator`], checked before it becomes a cursor.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigatorState {
    sections: Vec<usize>,
    #[serde(default)]
    position: Option<usize>,
}

impl TryFrom<NavigatorState> for ChangeNavigator {
    type Error = String;

    fn try_from(state: NavigatorState) -> Result<Self, Self::Error> {
        if !state.sections.windows(2).all(|w| w[0] < w[1]) {
            return Err("sections must be strictly increasing".to_string());
        }
        if let Some(pos) = state.position {
            if pos >= state.sections.len() {
                return Err(format!(
                    "position {} out of range for {} sections",
                    pos,
                    state.sections.len()
                ));
            }
        }
        Ok(Self {
            sections: state.sections,
            position: state.position,
        })
    }
}

impl ChangeNavigator {
    pub fn new(sections: Vec<usize>) -> Self {
        Self {
            sections,
            position: None,
        }
    }

    /// Replace the section list after the diff changed. Clears the cursor.
    pub fn reset(&mut self, sections: Vec<usize>) {
        self.sections = sections;
        self.position = None;
    }

    pub fn sections(&self) -> &[usize] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Cursor position within the section list.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Line index at the cursor.
    pub fn current(&self) -> Option<usize> {
        self.position
            .and_then(|pos| self.sections.get(pos).copied())
    }

    pub fn next(&mut self) -> Option<usize> {
        let target = match self.position {
            Some(pos) => pos + 1,
            None => 0,
        };
        self.move_to(target)
    }

    pub fn previous(&mut self) -> Option<usize> {
        let target = match self.position {
            Some(pos) => pos.saturating_sub(1),
            None => self.sections.len().saturating_sub(1),
        };
        self.move_to(target)
    }

    pub fn first(&mut self) -> Option<usize> {
        self.move_to(0)
    }

    pub fn last(&mut self) -> Option<usize> {
        self.move_to(self.sections.len().saturating_sub(1))
    }

    /// Jump to the n-th change (zero-based), clamped into range.
    pub fn jump_to(&mut self, n: usize) -> Option<usize> {
        self.move_to(n)
    }

    /// Toolbar label, e.g. "2 of 5".
    pub fn label(&self) -> String {
        match self.position {
            Some(pos) => format!("{} of {}", pos + 1, self.sections.len()),
            None => format!("0 of {}", self.sections.len()),
        }
    }

    fn move_to(&mut self, target: usize) -> Option<usize> {
        if self.sections.is_empty() {
            return None;
        }
        let last = self.sections.len() - 1;
        self.position = Some(target.min(last));
        self.current()
    }
}
