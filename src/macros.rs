/// Creates a frame containing the arguments.
///
/// This macro is used to create a frame, similar to the `vec!` macro for vectors.
/// There are two forms of this macro:
///
/// - Create a frame containing a given list of elements:
///
/// ```
/// use dimframe::{frame, Frame};
///
/// let a = frame![[1, 2, 3], [4, 5, 6]];
///
/// assert_eq!(a, Frame::from_array2([[1, 2, 3], [4, 5, 6]]));
/// ```
///
/// - Create a frame from a given element and shape:
///
/// ```
/// use dimframe::{frame, Frame};
///
/// let a = frame![[1; 3]; 2];
///
/// assert_eq!(a.to_vec(), [1; 6]);
/// ```
///
/// The shape is taken from the nesting of the arguments, and up to three levels of
/// nesting are supported. Empty dimensions are not allowed and panic at run time.
#[macro_export]
macro_rules! frame {
    ($([$([$($x:expr),* $(,)?]),+ $(,)?]),+ $(,)?) => (
        $crate::Frame::from_array3([$([$([$($x),*]),+]),+])
    );
    ($([$($x:expr),* $(,)?]),+ $(,)?) => (
        $crate::Frame::from_array2([$([$($x),*]),+])
    );
    ($($x:expr),* $(,)?) => (
        $crate::Frame::from_array1([$($x),*])
    );
    ([[$elem:expr; $i:expr]; $j:expr]; $k:expr) => (
        $crate::Frame::from_array3([[[$elem; $i]; $j]; $k])
    );
    ([$elem:expr; $i:expr]; $j:expr) => (
        $crate::Frame::from_array2([[$elem; $i]; $j])
    );
    ($elem:expr; $i:expr) => (
        $crate::Frame::from_array1([$elem; $i])
    );
}
