//! ChainList: one bucket's worth of entries as a singly linked list.
//!
//! Each node owns its successor through `next`; the list owns the head.
//! Keys are unique within a list. New keys are linked at the tail so node
//! order is insertion order within the bucket.

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    next: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            next: None,
        }
    }
}

#[derive(Debug)]
pub struct ChainList<V> {
    head: Option<Box<Node<V>>>,
}

impl<V> Default for ChainList<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs in node order.
pub struct Iter<'a, V> {
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            (node.key.as_str(), &node.value)
        })
    }
}

impl<V> ChainList<V> {
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Overwrites the value of an existing `key` and returns `true`, or links a
    /// new node at the tail and returns `false`.
    pub fn append(&mut self, key: String, value: V) -> bool {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            if node.key == key {
                node.value = value;
                return true;
            }
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node::new(key, value)));
        false
    }

    pub fn get_value(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_value_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Unlinks the node holding `key` and hands back its owned key and value.
    pub fn take(&mut self, key: &str) -> Option<(String, V)> {
        let pos = self.iter().position(|(k, _)| k == key)?;

        // Walk to the link that owns the matching node: the head for
        // position 0, otherwise the predecessor's `next`.
        let mut cursor = &mut self.head;
        for _ in 0..pos {
            cursor = &mut cursor.as_mut()?.next;
        }
        let mut removed = cursor.take()?;
        *cursor = removed.next.take();
        Some((removed.key, removed.value))
    }

    /// Position of the first node whose value equals `value`.
    pub fn find(&self, value: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        self.iter().position(|(_, v)| v == value)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<V> Drop for ChainList<V> {
    // Unlink node by node; the default recursive drop can overflow the stack
    // on a long chain.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl<'a, V> IntoIterator for &'a ChainList<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn list_of(pairs: &[(&str, i32)]) -> ChainList<i32> {
        let mut l = ChainList::new();
        for (k, v) in pairs {
            assert!(!l.append((*k).to_string(), *v));
        }
        l
    }

    fn keys(l: &ChainList<i32>) -> Vec<&str> {
        l.iter().map(|(k, _)| k).collect()
    }

    /// Invariant: new keys go to the tail; existing order is preserved.
    #[test]
    fn append_links_at_tail() {
        let l = list_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(keys(&l), ["a", "b", "c"]);
        assert_eq!(l.len(), 3);
        assert!(!l.is_empty());
    }

    /// Invariant: appending an existing key updates in place, reports `true`,
    /// and does not change the length. Holds for head, middle and tail nodes.
    #[test]
    fn append_existing_key_updates_in_place() {
        let mut l = list_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert!(l.append("a".to_string(), 10));
        assert!(l.append("b".to_string(), 20));
        assert!(l.append("c".to_string(), 30));
        assert_eq!(l.len(), 3);
        assert_eq!(keys(&l), ["a", "b", "c"]);
        assert_eq!(l.get_value("a"), Some(&10));
        assert_eq!(l.get_value("b"), Some(&20));
        assert_eq!(l.get_value("c"), Some(&30));
    }

    #[test]
    fn lookups_on_empty_list() {
        let mut l: ChainList<i32> = ChainList::new();
        assert!(l.is_empty());
        assert_eq!(l.len(), 0);
        assert_eq!(l.get_value("x"), None);
        assert!(!l.contains("x"));
        assert!(!l.remove("x"));
        assert_eq!(l.find(&1), None);
    }

    #[test]
    fn get_value_and_contains_parity() {
        let l = list_of(&[("a", 1), ("b", 2)]);
        for k in ["a", "b", "z", ""] {
            assert_eq!(l.get_value(k).is_some(), l.contains(k));
        }
    }

    /// Invariant: removing the head keeps the rest of the chain reachable.
    #[test]
    fn remove_head_keeps_tail() {
        let mut l = list_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert!(l.remove("a"));
        assert_eq!(keys(&l), ["b", "c"]);
        assert_eq!(l.get_value("c"), Some(&3));
    }

    #[test]
    fn remove_middle_and_tail() {
        let mut l = list_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert!(l.remove("b"));
        assert_eq!(keys(&l), ["a", "c"]);
        assert!(l.remove("c"));
        assert_eq!(keys(&l), ["a"]);
        assert!(!l.remove("c"));
        assert!(l.remove("a"));
        assert!(l.is_empty());
    }

    #[test]
    fn remove_absent_key_leaves_list_untouched() {
        let mut l = list_of(&[("a", 1), ("b", 2)]);
        assert!(!l.remove("zz"));
        assert_eq!(keys(&l), ["a", "b"]);
    }

    #[test]
    fn take_returns_owned_pair() {
        let mut l = list_of(&[("a", 1), ("b", 2)]);
        assert_eq!(l.take("b"), Some(("b".to_string(), 2)));
        assert_eq!(l.take("b"), None);
        assert_eq!(l.len(), 1);
    }

    /// Invariant: `find` compares values, not keys, and reports the first match.
    #[test]
    fn find_returns_first_matching_position() {
        let l = list_of(&[("a", 7), ("b", 8), ("c", 7)]);
        assert_eq!(l.find(&7), Some(0));
        assert_eq!(l.find(&8), Some(1));
        assert_eq!(l.find(&9), None);
    }

    #[test]
    fn get_value_mut_updates_value() {
        let mut l = list_of(&[("a", 1), ("b", 2)]);
        *l.get_value_mut("b").unwrap() += 40;
        assert_eq!(l.get_value("b"), Some(&42));
        assert!(l.get_value_mut("nope").is_none());
    }

    /// Invariant: dropping a list drops every value exactly once, and a very
    /// long chain is torn down without recursing.
    #[test]
    fn drop_releases_every_value() {
        let drops = Rc::new(Cell::new(0usize));
        struct Tracked(Rc<Cell<usize>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut l = ChainList::new();
        l.append("a".to_string(), Tracked(drops.clone()));
        l.append("b".to_string(), Tracked(drops.clone()));
        // Overwrite drops the previous value immediately.
        l.append("a".to_string(), Tracked(drops.clone()));
        assert_eq!(drops.get(), 1);
        assert!(l.remove("b"));
        assert_eq!(drops.get(), 2);

        // Prepend directly; appending this many keys is quadratic.
        for i in 0..100_000 {
            let next = l.head.take();
            l.head = Some(Box::new(Node {
                key: format!("n{i}"),
                value: Tracked(drops.clone()),
                next,
            }));
        }
        assert_eq!(l.len(), 100_001);
        drop(l);
        assert_eq!(drops.get(), 100_003);
    }
}
