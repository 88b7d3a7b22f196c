use std::{cell::RefCell, io, rc::Rc};

use colorsine::{
    app::{dispatch_key, TITLE},
    event::KeyListener,
    logging,
    params::ParameterStore,
    ratatui::Terminal,
    utils::{location_search, set_document_title},
    AnimationClock, AnimationFrameScheduler, App, DomBackend, RenderOnClock,
};
use tracing_subscriber::filter::LevelFilter;

fn main() -> io::Result<()> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    logging::init(if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });

    let mut store = ParameterStore::default();
    match location_search() {
        Ok(query) => {
            let applied = store.apply_query(&query);
            tracing::info!(applied, "loaded startup parameters");
        }
        Err(error) => tracing::warn!(%error, "unable to read the page query"),
    }
    set_document_title(TITLE)?;

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;
    let app = Rc::new(RefCell::new(App::new(store)));
    let clock = AnimationClock::new(AnimationFrameScheduler);

    KeyListener::new({
        let app = Rc::clone(&app);
        let clock = clock.clone();
        move |key| {
            dispatch_key(&app, &clock, key);
        }
    })?
    .forget();

    terminal.render_on_clock(&clock, move |frame, time| {
        let mut app = app.borrow_mut();
        if let Err(error) = app.on_tick(time) {
            tracing::error!(%error, time, "unable to compute frame");
        }
        app.render(frame);
    });
    clock.start();
    Ok(())
}
