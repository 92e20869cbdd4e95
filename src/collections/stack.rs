//! # Linked Stack
//!
//! Singly linked LIFO stack. Pushing never moves existing elements, which
//! keeps deep depth-first walks cheap.

use std::fmt;

struct Node<T> {
    value: T,
    previous: Option<Box<Node<T>>>,
}

/// LIFO stack backed by a singly linked list.
///
/// # Examples
///
/// ```
/// use minotaur::LinkedStack;
///
/// let mut stack = LinkedStack::new();
/// stack.push(1);
/// stack.push(2);
/// assert_eq!(stack.peek(), Some(&2));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.len(), 1);
/// ```
pub struct LinkedStack<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> LinkedStack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Pushes an element on top of the stack.
    pub fn push(&mut self, value: T) {
        let previous = self.head.take();
        self.head = Some(Box::new(Node { value, previous }));
        self.len += 1;
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Option<T> {
        let node = self.head.take()?;
        self.head = node.previous;
        self.len -= 1;
        Some(node.value)
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    /// Number of stacked elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the stack holds no elements.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        std::iter::successors(self.head.as_deref(), |node| node.previous.as_deref())
            .map(|node| &node.value)
    }
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedStack<T> {
    fn drop(&mut self) {
        // Unlink iteratively so long stacks do not recurse on drop.
        let mut head = self.head.take();
        while let Some(mut node) = head {
            head = node.previous.take();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for LinkedStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
