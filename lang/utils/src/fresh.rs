/// A monotone counter owned by one compilation unit.
#[derive(Debug, Default)]
pub struct Fresh(usize);

impl Fresh {
    pub fn new() -> Self {
        Fresh(0)
    }
    pub fn alloc(&mut self) -> usize {
        let old = self.0;
        self.0 += 1;
        old
    }
    pub fn name(&mut self, prefix: &str) -> String {
        format!("{}#{}", prefix, self.alloc())
    }
}

impl Iterator for Fresh {
    type Item = usize;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.alloc())
    }
}
