//! Ordered collections of messages with derived queries.

use std::collections::BTreeSet;
use std::fmt;

use bindery_reflect::BoundObject;

use crate::message::{Marker, Message};
use crate::severity::Severity;

/// An ordered list of [`Message`]s.
///
/// # Example
///
/// ```
/// use bindery_message::{Message, MessageList, Severity};
///
/// let mut list = MessageList::new();
/// list.add(Message::new_info("I1", "Draft saved"));
/// list.add(Message::new_error("E1", "Name is missing"));
///
/// assert_eq!(list.severity(), Some(Severity::Error));
/// assert_eq!(list.sort_by_severity().first().map(Message::text), Some("Name is missing"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MessageList {
    messages: Vec<Message>,
}

impl MessageList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_all(&mut self, other: &MessageList) {
        self.messages.extend(other.messages.iter().cloned());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Highest severity of all messages; `None` for an empty list.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.messages.iter().map(Message::severity).max()
    }

    #[must_use]
    pub fn contains_error_msg(&self) -> bool {
        self.messages.iter().any(|m| m.severity() == Severity::Error)
    }

    /// First message with the given severity.
    #[must_use]
    pub fn first_message(&self, severity: Severity) -> Option<&Message> {
        self.messages.iter().find(|m| m.severity() == severity)
    }

    /// First message of the highest severity present.
    #[must_use]
    pub fn message_with_highest_severity(&self) -> Option<&Message> {
        self.severity().and_then(|s| self.first_message(s))
    }

    #[must_use]
    pub fn message_by_code(&self, code: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.code() == Some(code))
    }

    fn filtered(&self, keep: impl Fn(&Message) -> bool) -> MessageList {
        self.messages.iter().filter(|m| keep(m)).cloned().collect()
    }

    /// Messages about `object`, for any or no property.
    #[must_use]
    pub fn messages_for(&self, object: &BoundObject) -> MessageList {
        self.filtered(|m| m.concerns(object))
    }

    /// Messages about `property` of `object`.
    #[must_use]
    pub fn messages_for_property(&self, object: &BoundObject, property: &str) -> MessageList {
        self.filtered(|m| m.concerns_property(object, property))
    }

    /// Messages about element `index` of `property` of `object`.
    #[must_use]
    pub fn messages_for_index(
        &self,
        object: &BoundObject,
        property: &str,
        index: usize,
    ) -> MessageList {
        self.filtered(|m| m.concerns_index(object, property, index))
    }

    #[must_use]
    pub fn messages_by_severity(&self, severity: Severity) -> MessageList {
        self.filtered(|m| m.severity() == severity)
    }

    #[must_use]
    pub fn messages_by_marker(&self, marker: &Marker) -> MessageList {
        self.filtered(|m| m.has_marker(marker))
    }

    /// Union of all markers.
    #[must_use]
    pub fn markers(&self) -> BTreeSet<Marker> {
        self.messages
            .iter()
            .flat_map(|m| m.markers().iter().cloned())
            .collect()
    }

    /// A copy sorted from highest to lowest severity, stable within a severity.
    #[must_use]
    pub fn sort_by_severity(&self) -> MessageList {
        let mut messages = self.messages.clone();
        messages.sort_by(|a, b| b.severity().cmp(&a.severity()));
        Self { messages }
    }

    /// All message texts joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .map(Message::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for MessageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.messages).finish()
    }
}

impl fmt::Display for MessageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

impl FromIterator<Message> for MessageList {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl Extend<Message> for MessageList {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

impl IntoIterator for MessageList {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl From<Vec<Message>> for MessageList {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_property::ObjectProperty;
    use bindery_reflect::{ClassBuilder, Reflect};

    struct Customer;

    impl Reflect for Customer {
        fn reflect(_: &mut ClassBuilder<Self>) {}
    }

    fn about(object: &BoundObject, property: &str, severity: Severity, text: &str) -> Message {
        Message::builder(text, severity)
            .invalid_object_property(ObjectProperty::new(object, property))
            .create()
    }

    #[test]
    fn empty_list_has_no_severity() {
        let list = MessageList::new();
        assert_eq!(list.severity(), None);
        assert!(list.message_with_highest_severity().is_none());
        assert_eq!(list.text(), "");
    }

    #[test]
    fn filters_by_object_and_property() {
        let a = BoundObject::new(Customer);
        let b = BoundObject::new(Customer);
        let list: MessageList = [
            about(&a, "name", Severity::Error, "a.name"),
            about(&a, "email", Severity::Warning, "a.email"),
            about(&b, "name", Severity::Info, "b.name"),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.messages_for(&a).len(), 2);
        assert_eq!(list.messages_for_property(&a, "name").text(), "a.name");
        assert_eq!(list.messages_for_property(&b, "name").text(), "b.name");
        assert!(list.messages_for_property(&b, "email").is_empty());
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let list: MessageList = [
            Message::new(Severity::Info, "i1"),
            Message::new(Severity::Error, "e1"),
            Message::new(Severity::Info, "i2"),
            Message::new(Severity::Warning, "w1"),
            Message::new(Severity::Error, "e2"),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.sort_by_severity().text(), "e1\ne2\nw1\ni1\ni2");
        assert_eq!(list.text(), "i1\ne1\ni2\nw1\ne2", "original order untouched");
    }

    #[test]
    fn code_and_marker_queries() {
        let marker = Marker::new("import");
        let mut list = MessageList::new();
        list.add(Message::new_warning("W1", "first"));
        list.add(
            Message::builder("second", Severity::Warning)
                .code("W2")
                .marker(marker.clone())
                .create(),
        );
        assert_eq!(list.message_by_code("W2").map(Message::text), Some("second"));
        assert_eq!(list.messages_by_marker(&marker).len(), 1);
        assert_eq!(list.markers().len(), 1);
        assert_eq!(list.first_message(Severity::Warning).map(Message::text), Some("first"));
        assert!(!list.contains_error_msg());
    }

    #[test]
    fn display_joins_lines() {
        let list: MessageList = vec![Message::new_error("E", "x"), Message::new_info("I", "y")].into();
        assert_eq!(list.to_string(), "ERROR[E] x\nINFO[I] y");
    }
}
