//! Integer class labels.

/// An integer class index in `[0, n_classes)`.
///
/// The flat binding surface stores labels as `u8`; wider types are accepted
/// for callers with more than 256 classes.
pub trait ClassLabel: Copy + Send + Sync {
    /// The class this label selects.
    fn class_index(self) -> usize;
}

macro_rules! impl_class_label {
    ($($ty:ty),*) => {
        $(
            impl ClassLabel for $ty {
                #[inline]
                fn class_index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_class_label!(u8, u16, u32, usize);
