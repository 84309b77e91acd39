use crate::config::{self, NotifyMode};
use crate::events::AppEvent;
use crate::gui::icon::CategoryIcons;
use crate::gui::radar::draw;
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::rc::Rc;
use sweep::{
    Animator, CancelGuard, Notification, NotificationSink, Point, Radar, RandomField, SystemClock,
    Viewport,
};

pub struct AppInit {
    pub radar: Radar,
    pub notify: NotifyMode,
    pub config_path: PathBuf,
    pub marker_override: Option<usize>,
    pub events: async_channel::Receiver<AppEvent>,
}

/// Owns the running sweep. Dropping it unhooks the tick callback and cancels the animator,
/// so nothing touches the radar afterwards.
pub struct Animation {
    tick: Option<gtk::TickCallbackId>,
    _guard: CancelGuard,
}

impl Animation {
    fn start(radar: &Rc<RefCell<Radar>>, area: &gtk::DrawingArea) -> Self {
        let animator = Animator::new(SystemClock, radar.borrow().config().ms_per_degree);
        let guard = animator.token().guard();
        let radar = radar.clone();

        let tick = area.add_tick_callback(move |area, _| {
            match radar.borrow_mut().animate(&animator) {
                ControlFlow::Continue(()) => {
                    area.queue_draw();
                    glib::ControlFlow::Continue
                }
                ControlFlow::Break(()) => glib::ControlFlow::Break,
            }
        });

        Self {
            tick: Some(tick),
            _guard: guard,
        }
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.remove();
        }
        log::debug!("Sweep animation stopped");
    }
}

struct StatusSink {
    mode: NotifyMode,
    message: Option<String>,
}

impl StatusSink {
    fn new(mode: NotifyMode) -> Self {
        Self {
            mode,
            message: None,
        }
    }
}

impl NotificationSink for StatusSink {
    fn notify(&mut self, notification: &Notification) {
        let message = notification.to_string();
        log::info!("{}", message.replace('\n', ", "));
        if self.mode == NotifyMode::Status {
            self.message = Some(message);
        }
    }
}

pub struct AppModel {
    pub radar: Rc<RefCell<Radar>>,
    pub icons: Rc<RefCell<CategoryIcons>>,
    pub status: String,
    pub notify: NotifyMode,
    pub config_path: PathBuf,
    pub marker_override: Option<usize>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    pub animation: Option<Animation>,
}

#[derive(Debug)]
pub enum AppMsg {
    Click(Point),
    Regenerate,
    Close,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Radar"),
            set_default_size: (640, 640),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Close);
                        return glib::Propagation::Stop;
                    }
                    if key.to_lower() == gtk::gdk::Key::r {
                        sender.input(AppMsg::Regenerate);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[local_ref]
                drawing_area -> gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "radar-drawing-area",

                    add_controller = gtk::GestureClick {
                        set_button: gtk::gdk::BUTTON_PRIMARY,
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Click(Point::new(x, y)));
                        }
                    }
                },

                add_overlay = &gtk::Label {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 16,
                    add_css_class: "radar-status",
                    #[watch]
                    set_label: &model.status,
                    #[watch]
                    set_visible: !model.status.is_empty(),
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            radar,
            notify,
            config_path,
            marker_override,
            events,
        } = init;

        theme::load_css();

        let icons = Rc::new(RefCell::new(CategoryIcons::load(radar.categories())));
        let radar = Rc::new(RefCell::new(radar));

        let mut model = AppModel {
            radar: radar.clone(),
            icons: icons.clone(),
            status: String::new(),
            notify,
            config_path,
            marker_override,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            animation: None,
        };

        let drawing_area = &model.drawing_area;
        let widgets = view_output!();

        let radar_draw = radar.clone();
        drawing_area.set_draw_func(move |drawing_area, cr, width, height| {
            let colors = ThemeColors::from_context(&drawing_area.style_context());
            let radar = radar_draw.borrow();
            let viewport = Viewport::new(width as f64, height as f64, radar.config().extent);
            if let Err(e) = draw(cr, &radar.compose(), &viewport, &colors, &icons.borrow()) {
                log::error!("Drawing error: {}", e);
            }
        });

        let animation = Animation::start(&radar, drawing_area);
        model.animation = Some(animation);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Click(pixel) => {
                let point = self.viewport().to_scene(pixel);
                let mut sink = StatusSink::new(self.notify);
                let action = self.radar.borrow_mut().click(point, &mut sink);
                if let Some(message) = sink.message {
                    self.status = message;
                }
                if action.should_redraw {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Regenerate => {
                let action = self
                    .radar
                    .borrow_mut()
                    .regenerate(&mut RandomField::default());
                if action.should_redraw {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Close => {
                self.animation = None;
                self.root.close();
            }
            AppMsg::ConfigReload => self.reload(),
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.animation = None;
    }
}

impl AppModel {
    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
            self.radar.borrow().config().extent,
        )
    }

    fn reload(&mut self) {
        let mut config = match config::load_config(&self.config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        if let Some(count) = self.marker_override {
            config.scene.marker_count = count;
        }

        match config.build_radar(&mut RandomField::default()) {
            Ok(radar) => {
                *self.icons.borrow_mut() = CategoryIcons::load(radar.categories());
                *self.radar.borrow_mut() = radar;
                self.notify = config.notify;
                self.status.clear();
                // restart so a changed sweep rate takes effect; the old chain is cancelled on drop
                self.animation = Some(Animation::start(&self.radar, &self.drawing_area));
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Ignoring invalid config: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep::{CategoryLabel, MarkerLabel};

    #[test]
    fn status_sink_keeps_message_in_status_mode() {
        let mut sink = StatusSink::new(NotifyMode::Status);
        sink.notify(&Notification::Marker {
            label: MarkerLabel::new("Dot 2"),
            offset: Point::new(-3.26, 40.0),
        });
        assert_eq!(sink.message.as_deref(), Some("Clicked: Dot 2\nX: -3.3\nY: 40.0"));
    }

    #[test]
    fn status_sink_only_logs_in_log_mode() {
        let mut sink = StatusSink::new(NotifyMode::Log);
        sink.notify(&Notification::Category {
            label: CategoryLabel::new("Dark Web"),
        });
        assert!(sink.message.is_none());
    }
}
