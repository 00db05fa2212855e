use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use mediation::config::Settings;
use mediation::core::injector::Result as InjectResult;
use mediation::mediation::{DefaultMediatorManager, Mediator, MediatorManager};
use mediation::{
    GuardSpec, HookSpec, Injectable, Injector, MediatorFactory, MediatorMapping, MediatorType,
    TypeFilter, TypeKey, View,
};

struct Toolbar {
    title: String,
}

struct ToolbarMediator {
    toolbar: Rc<Toolbar>,
    hooked: Cell<bool>,
}

impl Injectable for ToolbarMediator {
    fn construct(injector: &Injector) -> InjectResult<Self> {
        Ok(Self {
            toolbar: injector.get::<Toolbar>()?,
            hooked: Cell::new(false),
        })
    }
}

impl Mediator for ToolbarMediator {
    fn initialize(&self, _view: &View) {
        tracing::info!(title = %self.toolbar.title, hooked = self.hooked.get(), "toolbar mediated");
    }

    fn destroy(&self) {
        tracing::info!(title = %self.toolbar.title, "toolbar mediator destroyed");
    }
}

fn main() -> std::io::Result<()> {
    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let _logging = mediation::logging::init(&settings.logging);

    let injector = Rc::new(Injector::new());
    let manager = Rc::new(DefaultMediatorManager::new());
    injector.map_shared::<dyn MediatorManager>(manager.clone());
    let factory = MediatorFactory::new(Rc::clone(&injector));

    let mapping = Rc::new(
        MediatorMapping::new(
            TypeFilter::new(),
            MediatorType::with_lifecycle::<ToolbarMediator>(),
        )
        .with_guards([GuardSpec::from_fn(|injector| {
            injector
                .get::<Toolbar>()
                .map_or(false, |toolbar| !toolbar.title.is_empty())
        })])
        .with_hooks([HookSpec::from_fn(|injector| {
            injector.get::<ToolbarMediator>()?.hooked.set(true);
            Ok(())
        })]),
    );

    let titled = View::new(Rc::new(Toolbar {
        title: "main".to_string(),
    }));
    let untitled = View::new(Rc::new(Toolbar {
        title: String::new(),
    }));

    for view in [&titled, &untitled] {
        let created = factory
            .create_mediators(view, TypeKey::of::<Toolbar>(), &[Rc::clone(&mapping)])
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        println!("{:?}: {} mediator(s)", view.key(), created.len());
    }

    manager.notify_view_removed(&titled);
    println!("mediators after view removal: {}", factory.mediator_count());

    factory.remove_all_mediators();
    Ok(())
}
