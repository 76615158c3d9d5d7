mod app;
mod dom;
mod logging;
mod observer;
mod port;
mod timers;
