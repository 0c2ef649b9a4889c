//! Interactive widgets on a small web-framework which prioritizes correctness and type-safety.
//!
//! Based closely upon The [Elm](https://elm-lang.org/) Architecture. A widget is a
//! [`Model`]: `view` renders it to a virtual [`Html`] tree, `update` is the reducer
//! which turns a message into the next state. The runtime diffs successive trees
//! and applies the changes to the browser DOM.
//!
//! Two widgets ship with the crate: a click [`Counter`](widgets::Counter) and a photo
//! [`Gallery`](widgets::Gallery).

#[macro_use]
extern crate log;

use derive_more::{Constructor, From};
use web_sys::Element as DomElement;

use std::borrow::Cow;
use std::fmt::{self, Debug};

use event::{Event, EventId, EventInner};
use html::{Attribute, Tag};

#[macro_use]
pub mod html;
mod diff;
pub mod event;
pub mod program;
pub mod testing;
pub mod util;
pub mod widgets;

pub use event::{on_click, on_input};
pub use program::{run, run_with, Config};

pub use wasm_bindgen::JsValue;

type JsResult<T> = Result<T, JsValue>;

/// A trait to associate a Model with a Msg type.
///
/// Necessary to ensure a Model is used with the corrent Msg and vice-versa
pub trait Model: 'static + Sized + Debug {
    type Msg: 'static;

    fn view(&self) -> Html<Self>;
    fn update(&mut self, msg: Self::Msg) -> Cmd<Self::Msg>;

    fn init(&mut self) -> Cmd<Self::Msg> {
        Cmd::none()
    }
}

// This impl is so we can do quick examples and tests for Html layout.
impl Model for () {
    type Msg = ();
    fn view(&self) -> Html<Self> {
        div![]
    }
    fn update(&mut self, _: ()) -> Cmd<()> {
        Cmd::none()
    }
}

// Convenience alias
type Str = Cow<'static, str>;

/// Longest chain of messages processed before a render
const MAX_CHAIN: usize = 100;

/// Drives a [`Model`] without a document.
///
/// Owns the model and the most recently rendered view. Every message goes through
/// [`Program::dispatch`], which runs `update` (following any chained commands) and
/// then re-renders. The browser app wraps one of these and patches the DOM with the
/// difference between the old and new view; tests use it directly.
pub struct Program<M: Model> {
    model: M,
    current_vdom: Html<M>,
}

impl<M: Model> Debug for Program<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Program (model: {:?})", self.model)
    }
}

impl<M: Model> Program<M> {
    pub fn new(mut model: M) -> Program<M> {
        let initcmd = model.init();
        let current_vdom = model.view();
        let mut program = Program {
            model,
            current_vdom,
        };
        program.step(initcmd);
        program
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// The view as of the last render
    pub fn view(&self) -> &Html<M> {
        &self.current_vdom
    }

    /// Run a single message through `update` and re-render
    pub fn dispatch(&mut self, msg: M::Msg) {
        self.step(Cmd::msg(msg));
    }

    /// Update the model with the given Cmd and re-render.
    ///
    /// Returns the previous view if a render happened, so the caller can diff it
    /// against the new one.
    pub(crate) fn step(&mut self, cmd: Cmd<M::Msg>) -> Option<Html<M>> {
        let mut chain = 0;
        if !self.loop_update(cmd, &mut chain) {
            trace!("Skipping render");
            return None;
        }
        trace!("Update vdom");
        let new_vdom = self.model.view();
        Some(std::mem::replace(&mut self.current_vdom, new_vdom))
    }

    /// Each command may trigger another command, and we do not want to render
    /// each time, so we call update in a loop and explicitly break
    /// when we eventually receive a `None` command.
    ///
    /// Returns whether a render is required.
    fn loop_update(&mut self, Cmd(mut cmd): Cmd<M::Msg>, chain: &mut usize) -> bool {
        loop {
            *chain += 1;
            if *chain > MAX_CHAIN {
                panic!("Infinite loop!")
            }
            match cmd {
                CmdInner::None => return true,
                // return without rendering. Generally need a Very Good Reason for this
                CmdInner::NoOp => return false,
                CmdInner::Msg(msg) => {
                    let Cmd(new_cmd) = self.model.update(msg);
                    cmd = new_cmd; // we go again
                }
                CmdInner::Multiple(cmds) => {
                    let mut render = false;
                    for cmd in cmds {
                        render |= self.loop_update(cmd, chain);
                    }
                    return render;
                }
            }
        }
    }
}

/// An event loop command.
///
/// See the various constructors for further explanation
pub struct Cmd<Msg>(CmdInner<Msg>);

enum CmdInner<Msg> {
    None,
    /// Indicates that no work should be done (no diffing or rendering)
    NoOp,
    Msg(Msg),
    Multiple(Vec<Cmd<Msg>>),
}

impl<Msg> Cmd<Msg> {
    /// Do nothing, then render
    pub fn none() -> Self {
        Cmd(CmdInner::None)
    }

    /// Do nothing and skip the render
    pub fn noop() -> Self {
        Cmd(CmdInner::NoOp)
    }

    /// Send a message to the `update` function. The page is rendered after all messages
    /// in a chain have been run.
    ///
    /// Care should be taken not to create an infinite chain of messages as this will
    /// effectively block the event loop
    pub fn msg(msg: Msg) -> Self {
        Cmd(CmdInner::Msg(msg))
    }

    /// Run multiple commands in turn. The page is rendered once, after the last.
    pub fn multiple(msgs: impl IntoIterator<Item = Cmd<Msg>>) -> Self {
        Cmd(CmdInner::Multiple(msgs.into_iter().collect()))
    }
}

// See https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeType
/// Represents a HTML DOM Node
#[derive(Debug, From)]
pub enum Html<M: Model> {
    Text(Str),
    Element(Element<M>),
}

impl<M: Model> std::fmt::Display for Html<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Html::Text(text) => write!(f, "{}", text),
            Html::Element(elem) => write!(f, "{}", elem),
        }
    }
}

impl<M: Model> Html<M> {
    pub fn as_element(&self) -> Option<&Element<M>> {
        match self {
            Html::Element(elem) => Some(elem),
            Html::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.gather_text(&mut out);
        out
    }

    fn gather_text(&self, out: &mut String) {
        match self {
            Html::Text(text) => out.push_str(text),
            Html::Element(elem) => {
                for c in &elem.children {
                    c.gather_text(out)
                }
            }
        }
    }

    /// Find all events attached the current node and all child nodes. This is useful
    /// because we have to clean up the events 'manually' when a node is removed
    fn get_nested_event_ids(&self) -> Vec<EventId> {
        let mut events_to_rm = Vec::new();
        self.recursively_gather_event_ids(&mut events_to_rm);
        events_to_rm
    }

    fn recursively_gather_event_ids(&self, ids: &mut Vec<EventId>) {
        match &self {
            Html::Text(_) => (),
            Html::Element(elem) => {
                for ev in &elem.events {
                    ids.push(ev.id());
                }
                for c in &elem.children {
                    c.recursively_gather_event_ids(ids)
                }
            }
        }
    }
}

#[derive(Debug, Constructor)]
/// Represents an HTML Element
pub struct Element<M: Model> {
    tag: Tag,
    attrs: Vec<Attribute>,
    events: Vec<Event<M>>,
    children: Vec<Html<M>>,
}

impl<M: Model> Element<M> {
    /// Create an empty tagged element
    pub fn tag(tag: Tag) -> Element<M> {
        Element::new(tag, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn tag_name(&self) -> Tag {
        self.tag
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn children(&self) -> &[Html<M>] {
        &self.children
    }

    /// Value of the attribute with the given DOM key, e.g. `"src"`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key() == key)
            .map(|attr| attr.value())
    }

    /// Text held directly by this element, ignoring nested elements
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Html::Text(t) => Some(&**t),
                Html::Element(_) => None,
            })
            .collect()
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            c.gather_text(&mut out)
        }
        out
    }

    /// The message this element would send if clicked
    pub(crate) fn click_handler(&self) -> Option<&std::rc::Rc<dyn Fn() -> M::Msg>> {
        self.events.iter().find_map(|ev| match &ev.inner {
            EventInner::OnClick(cb) => Some(cb),
            _ => None,
        })
    }

    pub(crate) fn input_handler(&self) -> Option<&std::rc::Rc<dyn Fn(String) -> M::Msg>> {
        self.events.iter().find_map(|ev| match &ev.inner {
            EventInner::OnInput(cb) => Some(cb),
            _ => None,
        })
    }
}

impl<M: Model> std::fmt::Display for Element<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<{}", self.tag)?;
        for attr in &self.attrs {
            write!(f, " {}=\"{}\"", attr.key(), attr.value())?;
        }
        write!(f, ">")?;
        if self.tag.is_void() {
            return Ok(());
        }
        for c in &self.children {
            write!(f, "{}", c)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::id;

    #[derive(Debug, Default)]
    struct Chain {
        seen: Vec<u32>,
    }

    impl Model for Chain {
        type Msg = u32;

        fn view(&self) -> Html<Self> {
            p!(format!("{:?}", self.seen))
        }

        fn update(&mut self, msg: u32) -> Cmd<u32> {
            self.seen.push(msg);
            match msg {
                0 => Cmd::noop(),
                n if n % 10 == 0 => Cmd::multiple(vec![Cmd::msg(n + 1), Cmd::msg(n + 2)]),
                n if n < 5 => Cmd::msg(n + 1),
                _ => Cmd::none(),
            }
        }
    }

    #[test]
    fn chained_messages_render_once() {
        let mut program = Program::new(Chain::default());
        program.dispatch(3);
        assert_eq!(program.model().seen, vec![3, 4, 5]);
        assert_eq!(program.view().to_string(), "<p>[3, 4, 5]</p>");
    }

    #[test]
    fn multiple_runs_every_command() {
        let mut program = Program::new(Chain::default());
        program.dispatch(20);
        assert_eq!(program.model().seen, vec![20, 21, 22]);
    }

    #[test]
    fn noop_skips_render() {
        let mut program = Program::new(Chain::default());
        assert!(program.step(Cmd::msg(0)).is_none());
        // the model changed but the view is stale on purpose
        assert_eq!(program.model().seen, vec![0]);
        assert_eq!(program.view().to_string(), "<p>[]</p>");
    }

    #[derive(Debug)]
    struct Forever;

    impl Model for Forever {
        type Msg = ();
        fn view(&self) -> Html<Self> {
            div![]
        }
        fn update(&mut self, _: ()) -> Cmd<()> {
            Cmd::msg(())
        }
    }

    #[test]
    #[should_panic(expected = "Infinite loop!")]
    fn endless_chain_panics() {
        Program::new(Forever).dispatch(());
    }

    #[test]
    fn text_helpers() {
        let html: Html<()> = div!(id("x"), "a", p!("b", span!("c")), "d");
        let elem = html.as_element().unwrap();
        assert_eq!(elem.own_text(), "ad");
        assert_eq!(elem.text_content(), "abcd");
        assert_eq!(elem.attr("id"), Some("x"));
        assert_eq!(elem.attr("src"), None);
    }
}
