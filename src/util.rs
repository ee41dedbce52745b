/// The shared pointer used for keys and subtrees. `Rc` unless the `arc` feature asks for
/// snapshots that can cross threads.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

pub(crate) enum Removal<T> {
    /// The key wasn't found so nothing was removed. The caller can keep sharing its subtree.
    NotFound,
    /// The key was removed. `T` replaces the subtree the removal started from.
    Removed(T),
}

impl<T> Removal<T> {
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Removal<U> {
        match self {
            Self::NotFound => Removal::NotFound,
            Self::Removed(t) => Removal::Removed(f(t)),
        }
    }
}
