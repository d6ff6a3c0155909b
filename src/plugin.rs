use std::{collections::HashMap, fmt, path::Path, sync::Arc, time::Duration};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
    reflect::TypePath,
};
use tracing::{error, info, warn};

use crate::{
    definition::DialogDefinition,
    error::DialogError,
    pages::DialogPageGraph,
    scheduler::{Scheduler, TickScheduler},
    services::DialogServices,
    session::{HostRef, SessionRef},
    settings::DialogSettings,
};

/// Runtime plus `*.dialog.ron` asset loading.
pub struct DialogPlugin;

impl Plugin for DialogPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((DialogRuntimePlugin, DialogAssetPlugin));
    }
}

/// Tick clock, graph library and [`OpenDialog`] handling. Uses an existing
/// [`DialogSettings`] resource, or loads one.
pub struct DialogRuntimePlugin;

impl Plugin for DialogRuntimePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<DialogSettings>()
            .cloned()
            .unwrap_or_else(DialogSettings::load_or_default);

        app.insert_resource(DialogClock::new(settings.ticks_per_second))
            .insert_resource(settings)
            .init_resource::<DialogLibrary>()
            .add_message::<OpenDialog>()
            .add_systems(Update, (tick_dialog_clock, handle_open_dialog).chain());
    }
}

pub struct DialogAssetPlugin;

impl Plugin for DialogAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<DialogDefinitionAsset>()
            .init_asset_loader::<DialogDefinitionLoader>()
            .add_systems(Update, register_loaded_dialogs.before(handle_open_dialog));
    }
}

/// Converts frame time into scheduler ticks.
#[derive(Resource, Clone)]
pub struct DialogClock {
    scheduler: Arc<TickScheduler>,
    interval: Duration,
    accumulated: Duration,
}

impl DialogClock {
    pub fn new(ticks_per_second: f64) -> Self {
        let ticks_per_second = if ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            warn!("dialog clock rate {ticks_per_second} is not positive, using 20");
            20.0
        };
        Self {
            scheduler: Arc::new(TickScheduler::new()),
            interval: Duration::from_nanos((1e9 / ticks_per_second).round() as u64),
            accumulated: Duration::ZERO,
        }
    }

    pub fn ticks(&self) -> &Arc<TickScheduler> {
        &self.scheduler
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.scheduler.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn advance_by(&mut self, delta: Duration) {
        self.accumulated += delta;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            self.scheduler.tick();
        }
    }
}

/// The services new graphs are built with. Insert it before dialog assets finish loading.
#[derive(Resource, Clone)]
pub struct DialogServicesRes(pub Arc<DialogServices>);

#[derive(Resource, Default)]
pub struct DialogLibrary {
    graphs: HashMap<String, Arc<DialogPageGraph>>,
}

impl DialogLibrary {
    pub fn insert(&mut self, graph: Arc<DialogPageGraph>) -> Option<Arc<DialogPageGraph>> {
        self.graphs.insert(graph.name().to_string(), graph)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<DialogPageGraph>> {
        self.graphs.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<DialogPageGraph>> {
        self.graphs.remove(name)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

/// Show a page of a loaded graph: `page` or the graph's default page.
#[derive(Message, Clone)]
pub struct OpenDialog {
    pub graph: String,
    pub page: Option<String>,
    pub host: HostRef,
    pub session: SessionRef,
}

impl OpenDialog {
    pub fn new(graph: impl Into<String>, host: HostRef, session: SessionRef) -> Self {
        Self {
            graph: graph.into(),
            page: None,
            host,
            session,
        }
    }

    pub fn page(mut self, key: impl Into<String>) -> Self {
        self.page = Some(key.into());
        self
    }
}

impl fmt::Debug for OpenDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenDialog")
            .field("graph", &self.graph)
            .field("page", &self.page)
            .field("host", &self.host.name())
            .field("session", &self.session.name())
            .finish()
    }
}

#[derive(Asset, TypePath, Debug, Clone)]
pub struct DialogDefinitionAsset {
    pub name: String,
    pub definition: DialogDefinition,
}

#[derive(Default, TypePath)]
pub struct DialogDefinitionLoader;

impl AssetLoader for DialogDefinitionLoader {
    type Asset = DialogDefinitionAsset;
    type Error = DialogError;
    type Settings = ();

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let name = dialog_name(load_context.path().path());
        let definition = ron::de::from_bytes::<DialogDefinition>(&bytes)?;
        Ok(DialogDefinitionAsset { name, definition })
    }

    fn extensions(&self) -> &[&str] {
        &["dialog.ron"]
    }
}

/// `npc/guide.dialog.ron` is the dialog `guide`.
fn dialog_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("dialog");
    file_name
        .strip_suffix(".dialog.ron")
        .or_else(|| file_name.split('.').next())
        .unwrap_or(file_name)
        .to_string()
}

fn tick_dialog_clock(time: Res<Time>, mut clock: ResMut<DialogClock>) {
    clock.advance_by(time.delta());
}

/// Keeps [`DialogLibrary`] in sync with loaded `*.dialog.ron` assets. Assets that finish
/// loading before [`DialogServicesRes`] exists are registered once it is inserted.
fn register_loaded_dialogs(
    mut events: MessageReader<AssetEvent<DialogDefinitionAsset>>,
    assets: Res<Assets<DialogDefinitionAsset>>,
    services: Option<Res<DialogServicesRes>>,
    mut library: ResMut<DialogLibrary>,
    mut names: Local<HashMap<AssetId<DialogDefinitionAsset>, String>>,
) {
    let Some(services) = services else {
        for event in events.read() {
            if let AssetEvent::Added { id } = event {
                warn!("dialog asset {id:?} loaded before DialogServicesRes, registering it later");
            }
        }
        return;
    };

    if services.is_added() {
        events.clear();
        for (id, asset) in assets.iter() {
            register_dialog(id, asset, &services.0, &mut library, &mut names);
        }
        return;
    }

    for event in events.read() {
        match event {
            AssetEvent::Added { id } | AssetEvent::Modified { id } => {
                let Some(asset) = assets.get(*id) else {
                    warn!("dialog asset {id:?} not ready");
                    continue;
                };
                register_dialog(*id, asset, &services.0, &mut library, &mut names);
            }
            AssetEvent::Removed { id } => {
                if let Some(name) = names.remove(id) {
                    library.remove(&name);
                    info!("dialog '{name}' unloaded");
                }
            }
            _ => {}
        }
    }
}

fn register_dialog(
    id: AssetId<DialogDefinitionAsset>,
    asset: &DialogDefinitionAsset,
    services: &Arc<DialogServices>,
    library: &mut DialogLibrary,
    names: &mut HashMap<AssetId<DialogDefinitionAsset>, String>,
) {
    match DialogPageGraph::load(
        asset.name.clone(),
        asset.definition.clone(),
        services.clone(),
    ) {
        Ok(graph) => {
            names.insert(id, asset.name.clone());
            library.insert(graph);
        }
        Err(error) => error!("{error}"),
    }
}

fn handle_open_dialog(mut messages: MessageReader<OpenDialog>, library: Res<DialogLibrary>) {
    for msg in messages.read() {
        let Some(graph) = library.get(&msg.graph) else {
            warn!("dialog '{}' not found", msg.graph);
            continue;
        };
        let page = match &msg.page {
            Some(key) => graph.resolve(key),
            None => Ok(graph.default_page()),
        };
        match page {
            Ok(page) => page.send(&msg.host, &msg.session),
            Err(error) => warn!("{error}"),
        }
    }
}
