//! The small, closed set of scene-change kinds that can invalidate
//! compiled output.

use bitflags::bitflags;

bitflags! {
    /// A bitset over the kinds of scene edit that can invalidate a
    /// compiled node or input connection.
    ///
    /// The set is small and closed today (§3), but the representation is a
    /// bitset specifically so that adding a new reason later does not
    /// change the shape of [`crate::Journal`] or the uncompilation table.
    pub struct EditReason: u8 {
        /// The scene object (and everything below it) was resynced: it may
        /// have been removed, recreated with different properties, or
        /// had its type/schema change.
        const RESYNCED_OBJECT = 0b001;
        /// The set of properties (attributes/relationships) on a prim
        /// changed, without the prim itself being resynced.
        const CHANGED_PROPERTY_LIST = 0b010;
        /// A relationship's target paths changed.
        const CHANGED_TARGET_PATHS = 0b100;
    }
}

impl Default for EditReason {
    fn default() -> Self {
        EditReason::empty()
    }
}

impl EditReason {
    /// The empty reason set, equivalent to [`EditReason::empty`].
    pub const NONE: EditReason = EditReason::empty();

    /// Returns `true` if `self` and `other` share at least one bit.
    pub fn intersects_reason(&self, other: EditReason) -> bool {
        self.intersects(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_containment() {
        let a = EditReason::RESYNCED_OBJECT;
        let b = EditReason::CHANGED_TARGET_PATHS;
        let union = a | b;
        assert!(union.contains(a));
        assert!(union.contains(b));
        assert!(!a.contains(b));
    }

    #[test]
    fn none_intersects_nothing() {
        assert!(!EditReason::NONE.intersects_reason(EditReason::RESYNCED_OBJECT));
    }

    #[test]
    fn intersection_detects_overlap() {
        let rule = EditReason::RESYNCED_OBJECT;
        let change = EditReason::RESYNCED_OBJECT | EditReason::CHANGED_PROPERTY_LIST;
        assert!(rule.intersects_reason(change));

        let other_rule = EditReason::CHANGED_TARGET_PATHS;
        assert!(!other_rule.intersects_reason(change));
    }
}
