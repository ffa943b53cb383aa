//! Cursor and scroll bookkeeping for the product list.

/// Selected row and first visible row of a scrolling list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: usize,
    pub offset: usize,
}

impl ListCursor {
    pub fn down(&mut self, count: usize, height: usize) {
        if count == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(count - 1);
        self.follow(height);
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.offset = self.offset.min(self.selected);
    }

    pub fn top(&mut self) {
        *self = Self::default();
    }

    pub fn bottom(&mut self, count: usize, height: usize) {
        if count > 0 {
            self.selected = count - 1;
            self.follow(height);
        }
    }

    /// Move down half a page
    pub fn page_down(&mut self, count: usize, height: usize) {
        if count == 0 {
            return;
        }
        self.selected = (self.selected + (height / 2).max(1)).min(count - 1);
        self.follow(height);
    }

    /// Move up half a page
    pub fn page_up(&mut self, height: usize) {
        self.selected = self.selected.saturating_sub((height / 2).max(1));
        self.offset = self.offset.min(self.selected);
    }

    /// Pull the cursor back inside a list that shrank
    pub fn clamp(&mut self, count: usize, height: usize) {
        if count == 0 {
            self.top();
            return;
        }
        self.selected = self.selected.min(count - 1);
        self.offset = self.offset.min(self.selected);
        self.follow(height);
    }

    /// Whether the last row of the list is on screen
    pub fn sees_end(&self, count: usize, height: usize) -> bool {
        count > 0 && (self.selected + 1 >= count || self.offset + height >= count)
    }

    fn follow(&mut self, height: usize) {
        let height = height.max(1);
        if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_scrolls_when_leaving_view() {
        let mut c = ListCursor::default();
        for _ in 0..5 {
            c.down(10, 3);
        }
        assert_eq!(c, ListCursor { selected: 5, offset: 3 });
        c.down(10, 3);
        c.bottom(10, 3);
        assert_eq!(c, ListCursor { selected: 9, offset: 7 });
    }

    #[test]
    fn test_up_and_page_moves() {
        let mut c = ListCursor { selected: 9, offset: 7 };
        c.page_up(6);
        assert_eq!(c, ListCursor { selected: 6, offset: 6 });
        c.up();
        assert_eq!(c, ListCursor { selected: 5, offset: 5 });
        c.page_down(10, 6);
        assert_eq!(c.selected, 8);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut c = ListCursor { selected: 20, offset: 15 };
        c.clamp(4, 10);
        assert_eq!(c, ListCursor { selected: 3, offset: 3 });
        c.clamp(0, 10);
        assert_eq!(c, ListCursor::default());
    }

    #[test]
    fn test_sees_end() {
        let c = ListCursor::default();
        assert!(c.sees_end(3, 10));
        assert!(!c.sees_end(30, 10));
        assert!(!c.sees_end(0, 10));
        let c = ListCursor { selected: 29, offset: 20 };
        assert!(c.sees_end(30, 10));
    }
}
