/// Single-line editor for the query command, with a history of commands run.
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history; `None` means editing a fresh line.
    history_pos: Option<usize>,
    /// Line being edited before history browsing started.
    draft: String,
}

impl CommandInput {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.len(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Char-based cursor index (for rendering).
    pub fn cursor_char_index(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    fn set(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    /// Ctrl+W: drop trailing whitespace, then the word before the cursor.
    pub fn delete_word_back(&mut self) {
        let trimmed = self.text[..self.cursor].trim_end();
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.text.drain(word_start..self.cursor);
        self.cursor = word_start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Record the current line as run. Consecutive duplicates collapse.
    pub fn commit(&mut self) {
        let line = self.text.trim();
        if !line.is_empty() && self.history.last().map(String::as_str) != Some(line) {
            self.history.push(line.to_string());
        }
        self.history_pos = None;
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.draft = self.text.clone();
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        let entry = self.history[pos].clone();
        self.set(&entry);
    }

    pub fn history_next(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            let entry = self.history[pos + 1].clone();
            self.set(&entry);
        } else {
            self.history_pos = None;
            let draft = std::mem::take(&mut self.draft);
            self.set(&draft);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_cursor_at_end() {
        let input = CommandInput::new("git log");
        assert_eq!(input.text(), "git log");
        assert_eq!(input.cursor_char_index(), 7);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = CommandInput::new("git lg");
        input.move_left();
        input.insert_char('o');
        assert_eq!(input.text(), "git log");
        assert_eq!(input.cursor_char_index(), 6);
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut input = CommandInput::new("ab");
        input.move_home();
        input.delete_back();
        assert_eq!(input.text(), "ab");
        input.move_end();
        input.delete_back();
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_delete_word_back() {
        let mut input = CommandInput::new("git log --all  ");
        input.delete_word_back();
        assert_eq!(input.text(), "git log ");
        input.delete_word_back();
        input.delete_word_back();
        assert_eq!(input.text(), "");
        input.delete_word_back();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut input = CommandInput::new("");
        input.insert_char('é');
        input.insert_char('x');
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor_char_index(), 0);
        input.move_right();
        input.delete_back();
        assert_eq!(input.text(), "x");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor_char_index(), 1);
    }

    #[test]
    fn test_history_roundtrip_restores_draft() {
        let mut input = CommandInput::new("git log");
        input.commit();
        input.set("git stash list");
        input.commit();
        input.set("git log -n");

        input.history_prev();
        assert_eq!(input.text(), "git stash list");
        input.history_prev();
        assert_eq!(input.text(), "git log");
        input.history_prev();
        assert_eq!(input.text(), "git log");
        input.history_next();
        assert_eq!(input.text(), "git stash list");
        input.history_next();
        assert_eq!(input.text(), "git log -n");
        input.history_next();
        assert_eq!(input.text(), "git log -n");
    }

    #[test]
    fn test_commit_skips_blank_and_repeats() {
        let mut input = CommandInput::new("git log");
        input.commit();
        input.commit();
        input.set("   ");
        input.commit();
        assert_eq!(input.history.len(), 1);
    }
}
