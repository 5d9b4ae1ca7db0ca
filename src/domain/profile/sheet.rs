//! Profile Context - 档案面板开关

/// 档案选择面板是否打开，由调用方持有
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSheet {
    open: bool,
}

impl ProfileSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
