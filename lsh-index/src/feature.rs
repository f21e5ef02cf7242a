//! Items that expose their content as integer features.
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Trait of an item whose content is represented by a sequence of integer features.
///
/// Strategies scan the features once per internal hash function, so the returned
/// sequence is materialized once per hashing and must be the same every time
/// it is requested for an unchanged item.
pub trait FeatureSource {
    /// Gets the features of the item.
    fn features(&self) -> Cow<'_, [i32]>;
}

impl FeatureSource for [i32] {
    fn features(&self) -> Cow<'_, [i32]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> FeatureSource for [i32; N] {
    fn features(&self) -> Cow<'_, [i32]> {
        Cow::Borrowed(self)
    }
}

impl FeatureSource for Vec<i32> {
    fn features(&self) -> Cow<'_, [i32]> {
        Cow::Borrowed(self)
    }
}

impl<T> FeatureSource for &T
where
    T: FeatureSource + ?Sized,
{
    fn features(&self) -> Cow<'_, [i32]> {
        (**self).features()
    }
}

impl<T> FeatureSource for Box<T>
where
    T: FeatureSource + ?Sized,
{
    fn features(&self) -> Cow<'_, [i32]> {
        (**self).features()
    }
}

impl<T> FeatureSource for Rc<T>
where
    T: FeatureSource + ?Sized,
{
    fn features(&self) -> Cow<'_, [i32]> {
        (**self).features()
    }
}

impl<T> FeatureSource for Arc<T>
where
    T: FeatureSource + ?Sized,
{
    fn features(&self) -> Cow<'_, [i32]> {
        (**self).features()
    }
}
