//! The formatter traits.

#[impl_tools::autoimpl(for<T: trait + ?Sized> &T, &mut T, Box<T>, std::rc::Rc<T>, std::sync::Arc<T>)]
pub trait Ugly<'a, Fmter> {
    fn ugly(&self, f: &'a Fmter) -> String;
}

use pretty::RcDoc;

#[impl_tools::autoimpl(for<T: trait + ?Sized> &T, &mut T, Box<T>, std::rc::Rc<T>, std::sync::Arc<T>)]
pub trait Pretty<'a, Fmter> {
    fn pretty(&self, f: &'a Fmter) -> RcDoc<'a>;
}

/// Layout settings of the source-like printer.
#[derive(Clone, Debug)]
pub struct Formatter {
    pub indent: isize,
    pub width: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Formatter { indent: 2, width: 80 }
    }
    pub fn with_layout(indent: isize, width: usize) -> Self {
        Formatter { indent, width }
    }
    /// Renders with the configured width.
    pub fn render<'a, T>(&'a self, item: &T) -> String
    where
        T: Pretty<'a, Formatter> + ?Sized,
    {
        item.pretty(self).pretty(self.width).to_string()
    }
}
