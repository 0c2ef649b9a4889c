use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use derive_more::Display;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element as DomElement, Event as DomEvent};

use crate::util;
use crate::{Cmd, JsResult, Model, Str};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub(crate) struct EventId(u64);

/// A handler attached to an element in the virtual tree.
///
/// Two events are equal when they were built from the same function and equal
/// captured state, so an unchanged handler is not re-attached on re-render.
pub struct Event<M: Model> {
    id: EventId,
    pub(crate) inner: EventInner<M>,
}

pub(crate) enum EventInner<M: Model> {
    OnClick(Rc<dyn Fn() -> M::Msg>),
    OnInput(Rc<dyn Fn(String) -> M::Msg>),
}

impl<M: Model> fmt::Debug for Event<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            EventInner::OnClick(_) => write!(f, "OnClickEvent({})", self.id),
            EventInner::OnInput(_) => write!(f, "OnInputEvent({})", self.id),
        }
    }
}

impl<M: Model> PartialEq for Event<M> {
    fn eq(&self, other: &Event<M>) -> bool {
        self.id == other.id
    }
}

impl<M: Model> Eq for Event<M> {}

impl<M: Model> PartialOrd for Event<M> {
    fn partial_cmp(&self, other: &Event<M>) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Model> Ord for Event<M> {
    fn cmp(&self, other: &Event<M>) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<M: Model> Event<M> {
    pub(crate) fn id(&self) -> EventId {
        self.id
    }

    /// DOM name of the event this handler listens for
    pub fn name(&self) -> &'static str {
        match self.inner {
            EventInner::OnClick(_) => "click",
            EventInner::OnInput(_) => "input",
        }
    }

    fn click<S: Hash + 'static>(s: S, f: fn(&S) -> M::Msg) -> Event<M> {
        let hash = hash_closure(&s, "click", f as usize);
        Event {
            id: EventId(hash),
            inner: EventInner::OnClick(Rc::new(move || f(&s))),
        }
    }

    fn input<S: Hash + 'static>(s: S, f: fn(&S, String) -> M::Msg) -> Event<M> {
        let hash = hash_closure(&s, "input", f as usize);
        Event {
            id: EventId(hash),
            inner: EventInner::OnInput(Rc::new(move |val| f(&s, val))),
        }
    }
}

fn hash_closure<S: Hash>(s: S, kind: &str, fptr: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    kind.hash(&mut hasher);
    fptr.hash(&mut hasher);
    hasher.finish()
}

pub fn on_click<M: Model, S: Hash + 'static>(s: S, f: fn(&S) -> M::Msg) -> Event<M> {
    Event::click(s, f)
}

pub fn on_input<M: Model, S: Hash + 'static>(s: S, f: fn(&S, String) -> M::Msg) -> Event<M> {
    Event::input(s, f)
}

/// Feeds a command into the running app
pub(crate) type Dispatcher<M> = Rc<dyn Fn(Cmd<<M as Model>::Msg>)>;

/// Represents a listener attached to the DOM.
/// When it is dropped it will detach the corresponding listener.
pub(crate) struct Listener<M: Model> {
    element: DomElement,
    type_: Str,
    closure: Closure<dyn FnMut(DomEvent)>,
    marker: std::marker::PhantomData<M>,
}

impl<M: Model> Drop for Listener<M> {
    fn drop(&mut self) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback(&self.type_, self.closure.as_ref().unchecked_ref())
        {
            error!("Failed to remove {} listener: {:?}", self.type_, e);
        }
    }
}

impl<M: Model> Debug for Listener<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Listener({})", self.type_)
    }
}

fn event_handler<M: Model, F: Fn(DomEvent) -> Option<Cmd<M::Msg>> + 'static>(
    element: DomElement,
    event_name: &'static str,
    dispatch: Dispatcher<M>,
    handler: F,
) -> JsResult<Listener<M>> {
    let closure = Closure::wrap(Box::new(move |event: DomEvent| {
        trace!("Handling {} event", event_name);
        if let Some(cmd) = handler(event) {
            dispatch(cmd);
        }
    }) as Box<dyn FnMut(DomEvent)>);
    element.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
    Ok(Listener {
        element,
        type_: event_name.into(),
        closure,
        marker: std::marker::PhantomData,
    })
}

fn input_handler<M: Model>(
    element: &DomElement,
    dispatch: Dispatcher<M>,
    handler: Rc<dyn Fn(String) -> M::Msg>,
) -> JsResult<Listener<M>> {
    let inner = move |event: DomEvent| {
        let target = event.target()?;
        let target_el: &DomElement = target.dyn_ref()?;
        match util::get_str_prop(target_el, "value") {
            Ok(value) => Some(Cmd::msg(handler(value))),
            Err(e) => {
                error!("Input event without a value: {:?}", e);
                None
            }
        }
    };
    event_handler::<M, _>(element.clone(), "input", dispatch, inner)
}

fn click_handler<M: Model>(
    element: &DomElement,
    dispatch: Dispatcher<M>,
    handler: Rc<dyn Fn() -> M::Msg>,
) -> JsResult<Listener<M>> {
    let inner = move |_event: DomEvent| Some(Cmd::msg(handler()));
    event_handler::<M, _>(element.clone(), "click", dispatch, inner)
}

pub(crate) fn attach_event_listener<M: Model>(
    event: &Event<M>,
    element: &DomElement,
    dispatch: Dispatcher<M>,
) -> JsResult<Listener<M>> {
    match &event.inner {
        EventInner::OnClick(cb) => click_handler::<M>(element, dispatch, cb.clone()),
        EventInner::OnInput(cb) => input_handler::<M>(element, dispatch, cb.clone()),
    }
}
