use std::{
    cell::OnceCell,
    fmt::{Debug, Display},
    hash::Hash,
    path::PathBuf,
    rc::Rc,
    sync::Arc,
};

/// Line table of one source text, used to turn byte offsets into line/column pairs.
#[derive(Clone, Debug)]
pub struct FileInfo {
    /// offsets at which each line starts
    starts: Vec<usize>,
    path: Option<Arc<PathBuf>>,
}

impl FileInfo {
    pub fn new(s: &str, path: Option<Arc<PathBuf>>) -> Self {
        let mut starts = vec![0];
        starts.extend(s.match_indices('\n').map(|(i, _)| i + 1));
        FileInfo { starts, path }
    }
    /// One-based line and column of a byte offset.
    pub fn cursor(&self, offset: usize) -> Cursor2 {
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        Cursor2 { line, column: offset - start + 1 }
    }
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_deref()
    }
}

pub type Cursor1 = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor2 {
    pub line: usize,
    pub column: usize,
}

impl Display for Cursor2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Cursor2 { line, column } = self;
        write!(f, "{line}:{column}")
    }
}

/// A source location. The zero-width span at offset zero with no file attached
/// is the built-in origin.
#[derive(Clone, PartialEq, Eq)]
pub struct Span {
    span1: (Cursor1, Cursor1),
    span2: OnceCell<(Cursor2, Cursor2)>,
    path: OnceCell<Option<Arc<PathBuf>>>,
}

impl Span {
    pub fn new(l: usize, r: usize) -> Span {
        Span { span1: (l, r), span2: OnceCell::new(), path: OnceCell::new() }
    }
    pub fn dummy() -> Span {
        Span::new(0, 0)
    }
    pub fn is_dummy(&self) -> bool {
        self.span1 == (0, 0) && self.span2.get().is_none() && self.path.get().is_none()
    }
    pub fn make<T>(&self, inner: T) -> Sp<T> {
        Sp { inner, info: self.clone() }
    }
    pub fn make_rc<T>(&self, inner: T) -> Rc<Sp<T>> {
        Rc::new(Sp { inner, info: self.clone() })
    }
    /// Attaches line/column information; the first attachment wins.
    pub fn set_info(&self, info: &FileInfo) {
        let (start, end) = self.span1;
        let _ = self.span2.set((info.cursor(start), info.cursor(end)));
        let _ = self.path.set(info.path.clone());
    }
    pub fn get_path(&self) -> Option<&PathBuf> {
        self.path.get().and_then(|o| o.as_deref())
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::dummy()
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (l, r) = self.span1;
        if let Some(path) = self.get_path() {
            write!(f, "{}:", path.display())?;
        }
        if let Some((l2, r2)) = self.span2.get() {
            write!(f, "{l2}-{r2}")
        } else {
            write!(f, "{l}-{r}")
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// A value paired with its location. Comparison and hashing ignore the location.
#[derive(Default, Clone, Debug)]
pub struct Sp<T> {
    pub inner: T,
    pub info: Span,
}

impl<T: PartialEq> PartialEq for Sp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<T: Eq> Eq for Sp<T> {}

impl<T: Hash> Hash for Sp<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T: Display> Display for Sp<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info =
            if self.info.is_dummy() { format!("<internal>") } else { format!("{}", self.info) };
        write!(f, "{} ({})", self.inner, info)
    }
}
