use timbermap::{
    core::{
        config::MapOptions,
        geo::{LatLng, Point},
    },
    layers::{marker::MarkerLayer, route::RouteLayer, WeatherKind, WeatherLayer},
    services::{
        intel::{ADDRESS_INTEL_RADIUS_METERS, DEFAULT_INTEL_RADIUS_METERS},
        stores::DEFAULT_STORE_QUERY,
        AddressIntel, CurrentWeather, DirectionsProvider, LookupTracker, Place, ServiceClient,
        SiteIntel,
    },
    ui::{tabs::PanelTabs, widget::MapWidget},
    Container, MapEngine, MapEngineBuilder,
};
use tokio::runtime::Handle;

/// Job-site map viewer. An optional first argument names a JSON options file.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => MapOptions::from_path(&path)?,
        None => MapOptions::default(),
    };
    let client = ServiceClient::new(options.services.clone())?;
    let engine = MapEngineBuilder::new()
        .with_options(options)
        .with_standard_overlays()
        .build()?;
    let runtime = Handle::current();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Timber Nova - Job Map"),
        ..Default::default()
    };

    eframe::run_native(
        "timbermap-app",
        native_options,
        Box::new(move |cc| Box::new(TimbermapApp::new(cc, engine, client, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))?;

    Ok(())
}

/// The main application struct
struct TimbermapApp {
    engine: MapEngine,
    client: ServiceClient,
    tabs: PanelTabs,
    status: String,

    address: String,
    job: Option<Place>,
    job_lookup: LookupTracker<AddressIntel>,

    store_query: String,
    stores: Vec<Place>,
    store_lookup: LookupTracker<Vec<Place>>,

    intel: Option<SiteIntel>,
    intel_lookup: LookupTracker<SiteIntel>,

    weather: Option<CurrentWeather>,
    weather_lookup: LookupTracker<Option<CurrentWeather>>,

    user_lat: String,
    user_lng: String,
    user: Option<LatLng>,
    radius_meters: f64,
}

impl TimbermapApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        engine: MapEngine,
        client: ServiceClient,
        runtime: Handle,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut tabs = PanelTabs::new();
        tabs.add_panel("job-panel")
            .add_panel("intel-panel")
            .add_panel("weather-panel")
            .add_tab("Job", "#job-panel")
            .add_tab("Intel", "#intel-panel")
            .add_tab("Weather", "#weather-panel");
        tabs.activate(0);

        Self {
            engine,
            client,
            tabs,
            status: String::new(),
            address: String::new(),
            job: None,
            job_lookup: LookupTracker::new(runtime.clone()),
            store_query: DEFAULT_STORE_QUERY.to_string(),
            stores: Vec::new(),
            store_lookup: LookupTracker::new(runtime.clone()),
            intel: None,
            intel_lookup: LookupTracker::new(runtime.clone()),
            weather: None,
            weather_lookup: LookupTracker::new(runtime),
            user_lat: String::new(),
            user_lng: String::new(),
            user: None,
            radius_meters: 100.0,
        }
    }

    /// Where site lookups are centered: the job if there is one
    fn focus(&self) -> LatLng {
        self.job
            .as_ref()
            .map(Place::position)
            .unwrap_or_else(|| self.engine.visible_center())
    }

    fn search_address(&mut self) {
        let client = self.client.clone();
        let address = self.address.clone();
        self.job_lookup
            .start(async move { client.address_intel(&address).await });
        self.status = format!("Searching for '{}'...", self.address.trim());
    }

    fn refresh_site(&mut self) {
        let at = self.focus();
        let radius = if self.job.is_some() {
            ADDRESS_INTEL_RADIUS_METERS
        } else {
            DEFAULT_INTEL_RADIUS_METERS
        };
        let client = self.client.clone();
        self.intel_lookup
            .start(async move { client.site_intel(at, radius).await });
        self.refresh_weather(at);
    }

    fn refresh_weather(&mut self, at: LatLng) {
        let client = self.client.clone();
        self.weather_lookup
            .start(async move { client.current_weather(at).await });
    }

    fn show_stores(&mut self, stores: Vec<Place>) {
        if let Some(markers) = self.engine.overlay_mut::<MarkerLayer>() {
            markers.clear_store_markers();
            for store in &stores {
                markers.add_store_marker(store.lat, store.lng, store.display_name.clone());
            }
        }
        self.stores = stores;
    }

    fn find_stores(&mut self) {
        let client = self.client.clone();
        let query = self.store_query.clone();
        let center = self.focus();
        self.store_lookup
            .start(async move { client.nearby_stores(center, &query).await });
    }

    fn poll_lookups(&mut self) {
        if let Some(result) = self.job_lookup.poll() {
            match result {
                Ok(report) => {
                    let place = report.place.clone();
                    self.engine
                        .show_job_location(place.position(), place.display_name.clone());
                    self.status = place.display_name.clone();
                    self.refresh_weather(place.position());
                    self.show_stores(report.all_stores().cloned().collect());
                    self.intel = Some(report.site);
                    self.job = Some(place);
                }
                Err(e) => {
                    log::warn!("geocoding failed: {}", e);
                    self.status = format!("Address not found: {}", e);
                }
            }
        }

        if let Some(result) = self.store_lookup.poll() {
            match result {
                Ok(stores) => {
                    self.status = format!("{} stores found", stores.len());
                    self.show_stores(stores);
                }
                Err(e) => self.status = format!("Store search failed: {}", e),
            }
        }

        if let Some(result) = self.intel_lookup.poll() {
            match result {
                Ok(intel) => self.intel = Some(intel),
                Err(e) => self.status = format!("Site intel failed: {}", e),
            }
        }

        if let Some(result) = self.weather_lookup.poll() {
            match result {
                Ok(weather) => self.weather = weather,
                Err(e) => self.status = format!("Weather failed: {}", e),
            }
        }
    }

    fn any_pending(&self) -> bool {
        self.job_lookup.is_pending()
            || self.store_lookup.is_pending()
            || self.intel_lookup.is_pending()
            || self.weather_lookup.is_pending()
    }

    fn tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut clicked = None;
            for (i, tab) in self.tabs.tabs().iter().enumerate() {
                if ui.selectable_label(tab.active, &tab.label).clicked() {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                self.tabs.activate(i);
            }
        });
    }

    fn job_panel(&mut self, ui: &mut egui::Ui) {
        ui.label("Job address");
        ui.horizontal(|ui| {
            let edit = ui.text_edit_singleline(&mut self.address);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Go").clicked() || submitted {
                self.search_address();
            }
        });
        if let Some(job) = &self.job {
            ui.label(&job.display_name);
        }
        if ui.button("Clear job").clicked() {
            self.engine.clear_job_view();
            self.job = None;
            self.intel = None;
        }

        ui.separator();
        ui.label("Your location");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.user_lat).desired_width(80.0).hint_text("lat"));
            ui.add(egui::TextEdit::singleline(&mut self.user_lng).desired_width(80.0).hint_text("lng"));
            if ui.button("Use").clicked() {
                match (self.user_lat.trim().parse(), self.user_lng.trim().parse()) {
                    (Ok(lat), Ok(lng)) => {
                        let position = LatLng::new(lat, lng);
                        self.engine.show_user_location(position);
                        self.user = Some(position);
                    }
                    _ => self.status = "Unable to read location".to_string(),
                }
            }
        });

        if let (Some(user), Some(job)) = (self.user, self.job.as_ref().map(Place::position)) {
            ui.horizontal(|ui| {
                if ui.button("Show route").clicked() {
                    if let Some(route) = self.engine.overlay_mut::<RouteLayer>() {
                        route.set_route(user, job);
                    }
                }
                for provider in [DirectionsProvider::Google, DirectionsProvider::Apple] {
                    if ui.button(provider.label()).clicked() {
                        ui.ctx()
                            .open_url(egui::OpenUrl::new_tab(provider.url(user, job)));
                    }
                }
            });
        }

        ui.separator();
        ui.label("Work radius (m)");
        ui.add(egui::Slider::new(&mut self.radius_meters, 10.0..=500.0));
        if ui.button("Set radius at center").clicked() {
            self.engine.set_radius_at_center(self.radius_meters);
        }

        ui.separator();
        ui.label("Nearby stores");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.store_query);
            if ui.button("Find").clicked() {
                self.find_stores();
            }
        });
        for store in &self.stores {
            ui.small(&store.display_name);
        }
    }

    fn intel_panel(&mut self, ui: &mut egui::Ui) {
        if ui.button("Refresh").clicked() {
            self.refresh_site();
        }
        let Some(intel) = &self.intel else {
            ui.label("No site intel yet");
            return;
        };
        ui.heading(format!("Power lines ({})", intel.powerlines.len()));
        for line in &intel.powerlines {
            let voltage = line.tags.get("voltage").map(String::as_str).unwrap_or("?");
            ui.label(format!("{:.0} m  ({} V)", line.distance_meters, voltage));
        }
        ui.heading(format!("Structures ({})", intel.structures.len()));
        for structure in &intel.structures {
            let kind = structure.tags.get("building").map(String::as_str).unwrap_or("building");
            ui.label(format!("{:.0} m  {}", structure.distance_meters, kind));
        }
    }

    fn weather_panel(&mut self, ui: &mut egui::Ui) {
        ui.label("Base layer");
        let active = self.engine.base_layers().active_key().to_string();
        let keys: Vec<String> = self
            .engine
            .base_layers()
            .keys()
            .into_iter()
            .map(str::to_string)
            .collect();
        for key in keys {
            if ui.radio(active == key, &key).clicked() {
                self.engine.set_base_layer(&key);
            }
        }

        ui.separator();
        ui.label("Weather overlays");
        if let Some(layer) = self.engine.overlay_mut::<WeatherLayer>() {
            for kind in WeatherKind::ALL {
                let mut enabled = layer.is_enabled(kind);
                if ui.checkbox(&mut enabled, kind.as_str()).changed() {
                    layer.set_enabled(kind, enabled);
                }
            }
        }

        ui.separator();
        match &self.weather {
            Some(weather) => {
                ui.label(format!("{:.1} °C", weather.temperature));
                ui.label(format!(
                    "Wind {:.0} km/h from {:.0}°",
                    weather.windspeed, weather.winddirection
                ));
                if weather.is_windy() {
                    ui.colored_label(egui::Color32::RED, "High wind");
                }
            }
            None => {
                ui.label("No current conditions");
            }
        }
    }
}

impl eframe::App for TimbermapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_lookups();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let center = self.engine.visible_center();
                ui.label(format!(
                    "Center: {:.4}, {:.4} | Zoom: {}",
                    center.lat,
                    center.lng,
                    self.engine.zoom()
                ));
                ui.separator();
                ui.label(&self.status);
            });
        });

        egui::SidePanel::left("panel").resizable(true).show(ctx, |ui| {
            self.tab_bar(ui);
            ui.separator();
            let active = self.tabs.active_panel().map(str::to_string);
            egui::ScrollArea::vertical().show(ui, |ui| {
                match active.as_deref() {
                    Some("job-panel") => self.job_panel(ui),
                    Some("intel-panel") => self.intel_panel(ui),
                    Some("weather-panel") => self.weather_panel(ui),
                    _ => {}
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if !self.engine.is_initialized() {
                    let size = ui.available_size();
                    self.engine.init(Some(
                        Container::new("map", Point::new(size.x as f64, size.y as f64))
                            .with_placeholder("Loading map..."),
                    ));
                }
                ui.add(MapWidget::new(&mut self.engine));
            });

        if self.any_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
