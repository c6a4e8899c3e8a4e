//! Id-keyed operations over insertion-ordered collections.

use crate::domain::{Area, Goal, Mission, Note, Project, Subproject, Task, Theme};

/// A record with a stable string id
pub trait Record {
    fn id(&self) -> &str;
}

/// A record owned by exactly one parent
pub trait Child: Record {
    fn parent_id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(Note, Task, Mission, Area, Theme, Goal, Project, Subproject);

impl Child for Theme {
    fn parent_id(&self) -> &str {
        &self.area_id
    }
}

impl Child for Goal {
    fn parent_id(&self) -> &str {
        &self.theme_id
    }
}

impl Child for Project {
    fn parent_id(&self) -> &str {
        &self.goal_id
    }
}

impl Child for Subproject {
    fn parent_id(&self) -> &str {
        &self.project_id
    }
}

/// Copy of `items` with `record` appended
pub fn appended<T: Clone>(items: &[T], record: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(items);
    out.push(record);
    out
}

/// Copy of `items` with the element sharing `record`'s id swapped for it.
///
/// Returns `None` when no element matches so callers can keep the original.
pub fn replaced<T: Record + Clone>(items: &[T], record: T) -> Option<Vec<T>> {
    let pos = items.iter().position(|item| item.id() == record.id())?;
    let mut out = items.to_vec();
    out[pos] = record;
    Some(out)
}

/// Copy of `items` without the element whose id is `id`
pub fn without<T: Record + Clone>(items: &[T], id: &str) -> Vec<T> {
    items.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Copy of `children` without those whose parent is `parent_id`
pub fn orphaned_removed<C: Child + Clone>(children: &[C], parent_id: &str) -> Vec<C> {
    children
        .iter()
        .filter(|child| child.parent_id() != parent_id)
        .cloned()
        .collect()
}

/// Remove a parent and its direct children.
///
/// Only one level is removed: grandchildren keep their now-dangling parent id.
pub fn cascade_delete<P, C>(parents: &[P], children: &[C], id: &str) -> (Vec<P>, Vec<C>)
where
    P: Record + Clone,
    C: Child + Clone,
{
    (without(parents, id), orphaned_removed(children, id))
}
