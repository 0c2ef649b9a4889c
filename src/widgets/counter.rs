use crate::{on_click, Cmd, Html, Model};

/// A button showing how many times it has been clicked
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Counter {
    count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMsg {
    Clicked,
}

impl Counter {
    pub fn new() -> Counter {
        Counter::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn handle_click(&mut self) {
        self.count += 1;
        trace!("Counter at {}", self.count);
    }
}

impl Model for Counter {
    type Msg = CounterMsg;

    fn view(&self) -> Html<Self> {
        button!(
            self.count.to_string(),
            on_click::<Counter, _>((), |_| CounterMsg::Clicked)
        )
    }

    fn update(&mut self, msg: CounterMsg) -> Cmd<CounterMsg> {
        match msg {
            CounterMsg::Clicked => self.handle_click(),
        }
        Cmd::none()
    }
}
