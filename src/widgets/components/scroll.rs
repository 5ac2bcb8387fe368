/// Highlighted row plus the scroll window that keeps it visible.
#[derive(Debug, Clone)]
pub struct CursorNav {
    active: usize,
    scroll: ScrollState,
}

impl CursorNav {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            active: 0,
            scroll: ScrollState::new(max_visible),
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn set_max_visible(&mut self, n: usize) {
        self.scroll.max_visible = Some(n.max(1));
    }

    /// Wraps around both ends.
    pub fn move_by(&mut self, delta: isize, total: usize) -> usize {
        if total == 0 {
            self.active = 0;
            return 0;
        }
        let len = total as isize;
        self.active = (self.active as isize + delta).rem_euclid(len) as usize;
        self.scroll.ensure_visible(self.active, total);
        self.active
    }

    pub fn reset(&mut self, total: usize) {
        self.active = 0;
        self.scroll.offset = 0;
        self.scroll.ensure_visible(self.active, total);
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        self.scroll.visible_range(total)
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        self.scroll.footer(total)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub max_visible: Option<usize>,
}

impl ScrollState {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            offset: 0,
            max_visible,
        }
    }

    pub fn ensure_visible(&mut self, active: usize, total: usize) {
        let Some(max) = self.max_visible else {
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if active < self.offset {
            self.offset = active;
            return;
        }
        let last = self.offset.saturating_add(max).saturating_sub(1);
        if active > last {
            self.offset = active + 1 - max;
        }
        self.offset = self.offset.min(total - max);
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(limit) => {
                let start = self.offset.min(total);
                let end = (start + limit).min(total);
                (start, end)
            }
            None => (0, total),
        }
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        let arrow = match (start > 0, end < total) {
            (true, true) => " ↑↓",
            (true, false) => " ↑",
            (false, true) => " ↓",
            (false, false) => "",
        };
        Some(format!("[{}-{} of {}]{}", start + 1, end, total, arrow))
    }
}
