//! Comparison of two virtual trees.
//!
//! The result borrows from both trees and is consumed by the DOM layer, which
//! applies it to the live document.

use std::collections::BTreeSet;
use std::fmt::{self, Debug};

use crate::event::{Event, EventId};
use crate::html::Attribute;
use crate::{Html, Model};

#[derive(Clone, Debug)]
pub enum Delta<T> {
    Add(T),
    Remove(T),
}

/// Describes which nodes have changed and how
#[derive(Clone)]
pub(crate) enum Diff<'a, M: Model> {
    Insert(&'a Html<M>),
    Replace {
        with: &'a Html<M>,
        events_to_rm: Vec<EventId>,
    },
    Remove {
        events_to_rm: Vec<EventId>,
    },
    Update {
        attrs: Vec<Delta<&'a Attribute>>,
        events: Vec<Delta<&'a Event<M>>>,
        children: Vec<(u32, Diff<'a, M>)>,
    },
    Unchanged,
}

impl<'a, M: Model> Debug for Diff<'a, M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Diff::*;
        let txt = match self {
            Insert(_) => "Insert",
            Replace { .. } => "Replace",
            Remove { .. } => "Remove",
            Unchanged => "Unchanged",
            Update {
                attrs,
                events,
                children,
            } => {
                write!(f, "Update {{ ")?;
                if !attrs.is_empty() {
                    write!(f, "attrs ")?;
                }
                if !events.is_empty() {
                    write!(f, "events ")?;
                }
                if !children.is_empty() {
                    write!(f, "children: [")?;
                    for c in children {
                        write!(f, "{:?}", c)?;
                    }
                    write!(f, "]")?;
                }
                return write!(f, "}}");
            }
        };
        write!(f, "{}", txt)
    }
}

impl<'a, M: Model> Diff<'a, M> {
    pub(crate) fn is_unchanged(&self) -> bool {
        matches!(self, Diff::Unchanged)
    }
}

/// Set-difference of two ordered collections, removals first
fn deltas<'a, T: Ord>(old: &'a [T], new: &'a [T]) -> Vec<Delta<&'a T>> {
    if old == new {
        return Vec::new();
    }
    let oldset: BTreeSet<&T> = old.iter().collect();
    let newset: BTreeSet<&T> = new.iter().collect();
    let mut deltas = Vec::new();
    for &item in oldset.difference(&newset) {
        deltas.push(Delta::Remove(item))
    }
    for &item in newset.difference(&oldset) {
        deltas.push(Delta::Add(item))
    }
    deltas
}

pub(crate) fn diff_vdom<'a, M: Model>(old: &'a Html<M>, new: &'a Html<M>) -> Diff<'a, M> {
    let (old_el, new_el) = match (old, new) {
        (Html::Text(t1), Html::Text(t2)) => {
            return if t1 == t2 {
                Diff::Unchanged
            } else {
                Diff::Replace {
                    with: new,
                    events_to_rm: Vec::new(),
                }
            }
        }
        (Html::Text(_), Html::Element(_)) => {
            return Diff::Replace {
                with: new,
                events_to_rm: Vec::new(),
            }
        }
        (Html::Element(_), Html::Text(_)) => {
            return Diff::Replace {
                with: new,
                events_to_rm: old.get_nested_event_ids(),
            }
        }
        (Html::Element(e1), Html::Element(e2)) => (e1, e2),
    };

    if old_el.tag != new_el.tag {
        // assume everything can be nuked
        return Diff::Replace {
            with: new,
            events_to_rm: old.get_nested_event_ids(),
        };
    }

    let attrs = deltas(&old_el.attrs, &new_el.attrs);
    let events = deltas(&old_el.events, &new_el.events);

    let mut child_diffs = Vec::new();
    for (ix, (cold, cnew)) in old_el
        .children
        .iter()
        .zip(new_el.children.iter())
        .enumerate()
    {
        let diff = diff_vdom(cold, cnew);
        if !diff.is_unchanged() {
            child_diffs.push((ix as u32, diff))
        }
    }

    // Children are matched by position, so growth and shrinkage only ever
    // happen at the tail
    let curct = old_el.children.len();
    let nextct = new_el.children.len();
    if nextct > curct {
        for ix in curct..nextct {
            child_diffs.push((ix as u32, Diff::Insert(&new_el.children[ix])));
        }
    } else {
        for ix in nextct..curct {
            let events_to_rm = old_el.children[ix].get_nested_event_ids();
            child_diffs.push((ix as u32, Diff::Remove { events_to_rm }))
        }
    }

    child_diffs.sort_by_key(|t| t.0);
    if attrs.is_empty() && events.is_empty() && child_diffs.is_empty() {
        Diff::Unchanged
    } else {
        Diff::Update {
            attrs,
            events,
            children: child_diffs,
        }
    }
}
