//! Text keys: the key types that can be sorted by their text and
//! serialized as object member names.

use core::hash::Hash;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A key with a string representation.
///
/// Required by [`sort_asc`](crate::OrderedHashMap::sort_asc),
/// [`sort_desc`](crate::OrderedHashMap::sort_desc) and the codec. Maps whose
/// keys are not text simply do not have those methods.
///
/// The text must be stable for as long as the key is in a map, and two keys
/// that compare equal must have the same text.
///
/// ```
/// use ordered_hashmap::OrderedHashMap;
///
/// let mut m: OrderedHashMap<&str, i32> = OrderedHashMap::new();
/// m.set("b", 2);
/// m.set("a", 1);
/// m.sort_asc();
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
/// ```
///
/// Integer keys have no text, so sorting by text does not compile:
///
/// ```compile_fail
/// use ordered_hashmap::OrderedHashMap;
///
/// let mut m: OrderedHashMap<u32, i32> = OrderedHashMap::new();
/// m.set(2, 20);
/// m.sort_asc();
/// ```
///
/// ```compile_fail
/// use ordered_hashmap::OrderedHashMap;
///
/// let mut m: OrderedHashMap<u32, i32> = OrderedHashMap::new();
/// m.set(1, 10);
/// m.sort_desc();
/// ```
///
/// Nor does encoding them as JSON object members:
///
/// ```compile_fail
/// use ordered_hashmap::OrderedHashMap;
///
/// let mut m: OrderedHashMap<u32, i32> = OrderedHashMap::new();
/// m.set(1, 10);
/// let _ = m.to_json();
/// ```
///
/// ```compile_fail
/// use ordered_hashmap::OrderedHashMap;
///
/// fn encode<T: serde::Serialize>(_: &T) {}
///
/// let m: OrderedHashMap<u32, i32> = OrderedHashMap::new();
/// encode(&m);
/// ```
pub trait TextKey: Eq + Hash {
    fn as_text(&self) -> &str;
}

impl TextKey for String {
    #[inline]
    fn as_text(&self) -> &str {
        self.as_str()
    }
}

impl TextKey for &str {
    #[inline]
    fn as_text(&self) -> &str {
        self
    }
}

impl TextKey for Box<str> {
    #[inline]
    fn as_text(&self) -> &str {
        self
    }
}

impl TextKey for Rc<str> {
    #[inline]
    fn as_text(&self) -> &str {
        self
    }
}

impl TextKey for Arc<str> {
    #[inline]
    fn as_text(&self) -> &str {
        self
    }
}

impl TextKey for Cow<'_, str> {
    #[inline]
    fn as_text(&self) -> &str {
        self
    }
}
