//! Tags, attributes and the `div!`-style builder macros.

use derive_more::Display;

use crate::event::Event;
use crate::{Element, Html, Model, Str};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Tag {
    #[display(fmt = "div")]
    Div,
    #[display(fmt = "p")]
    P,
    #[display(fmt = "span")]
    Span,
    #[display(fmt = "button")]
    Button,
    #[display(fmt = "input")]
    Input,
    #[display(fmt = "label")]
    Label,
    #[display(fmt = "ul")]
    Ul,
    #[display(fmt = "li")]
    Li,
    #[display(fmt = "img")]
    Img,
}

impl Tag {
    /// Void elements never have children (and are printed without a closing tag)
    pub fn is_void(self) -> bool {
        match self {
            Tag::Input | Tag::Img => true,
            _ => false,
        }
    }
}

/// A (key, value) pair set on a DOM element.
///
/// Ordering is derived so a set of attributes can be diffed cheaply.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Id(Str),
    Class(Str),
    Value(Str),
    Type(Str),
    For(Str),
    Src(Str),
    Alt(Str),
    Role(Str),
    AriaLabel(Str),
}

impl Attribute {
    pub fn key(&self) -> &'static str {
        use Attribute::*;
        match self {
            Id(_) => "id",
            Class(_) => "class",
            Value(_) => "value",
            Type(_) => "type",
            For(_) => "for",
            Src(_) => "src",
            Alt(_) => "alt",
            Role(_) => "role",
            AriaLabel(_) => "aria-label",
        }
    }

    pub fn value(&self) -> &str {
        use Attribute::*;
        match self {
            Id(v) | Class(v) | Value(v) | Type(v) | For(v) | Src(v) | Alt(v)
            | Role(v) | AriaLabel(v) => v,
        }
    }
}

macro_rules! attr_key_value {
    ($func_name: ident, $tag: ident) => {
        pub fn $func_name(val: impl Into<Str>) -> Attribute {
            Attribute::$tag(val.into())
        }
    };
}

attr_key_value!(id, Id);
attr_key_value!(class, Class);
attr_key_value!(value, Value);
attr_key_value!(type_, Type);
attr_key_value!(for_, For);
attr_key_value!(src, Src);
attr_key_value!(alt, Alt);
attr_key_value!(role, Role);
attr_key_value!(aria_label, AriaLabel);

/// Anything that can be passed to one of the builder macros
pub trait ElemMod<M: Model> {
    fn modify_element(self, elem: &mut Element<M>);
}

impl<M: Model> ElemMod<M> for &'static str {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.children.push(Html::Text(self.into()))
    }
}

impl<M: Model> ElemMod<M> for String {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.children.push(Html::Text(self.into()))
    }
}

impl<M: Model> ElemMod<M> for Str {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.children.push(Html::Text(self))
    }
}

impl<M: Model> ElemMod<M> for Attribute {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.attrs.push(self)
    }
}

impl<M: Model> ElemMod<M> for Event<M> {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.events.push(self)
    }
}

impl<M: Model> ElemMod<M> for Html<M> {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.children.push(self)
    }
}

impl<M: Model> ElemMod<M> for Vec<Html<M>> {
    fn modify_element(self, elem: &mut Element<M>) {
        elem.children.extend(self)
    }
}

impl<M: Model, T: ElemMod<M>> ElemMod<M> for Option<T> {
    fn modify_element(self, elem: &mut Element<M>) {
        if let Some(inner) = self {
            inner.modify_element(elem)
        }
    }
}

macro_rules! make_dsl_macros {
    ($d:tt $($name:ident : $tag:ident),*) => {
        $(
            #[macro_export]
            macro_rules! $name {
                ($d($d modifier:expr),* $d(,)?) => {
                    {
                        #[allow(unused_mut)]
                        let mut element = $crate::Element::tag($crate::html::Tag::$tag);
                        $d($crate::html::ElemMod::modify_element($d modifier, &mut element);)*
                        $crate::Html::from(element)
                    }
                }
            }
        )*
    }
}

// Pass in the '$' symbol - workaround for macro_rules bug - see
// https://github.com/rust-lang/rust/issues/35853#issuecomment-415993963
make_dsl_macros!($
    div: Div,
    p: P,
    span: Span,
    button: Button,
    input: Input,
    label: Label,
    ul: Ul,
    li: Li,
    img: Img
);
