use crate::model::{Dispatcher, Transport};
use std::sync::Arc;

pub(crate) struct ServerState<T: Transport> {
    dispatcher: Arc<Dispatcher<T>>,
}

impl<T: Transport> ServerState<T> {
    pub(crate) fn new(dispatcher: Arc<Dispatcher<T>>) -> Self {
        Self { dispatcher }
    }

    pub(crate) fn dispatcher(&self) -> Arc<Dispatcher<T>> {
        Arc::clone(&self.dispatcher)
    }
}
