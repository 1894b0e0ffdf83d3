#![forbid(unsafe_code)]

//! Scripted storyboard for the sample application.
//!
//! Builds a main screen with page and footer containers, a set of nested and
//! dialog fragments, then opens a secondary screen. Every step advances a
//! virtual clock so throttled reports come out the same on every run.

use std::time::{Duration, Instant};

use spectrum::{
    ActivityId, ClassSpec, FragmentHost, FragmentId, LifecycleState, Rect, ReportEngine,
    SimWindow, SimulatedUi, UiEvent, ViewId, Visibility,
};

/// Virtual time between two storyboard steps.
pub const STEP_INTERVAL: Duration = Duration::from_millis(120);

const APP_PACKAGE: &str = "com.acelost.spectrum.app";

const SCREEN_WIDTH: i32 = 1080;
const FOOTER_TOP: i32 = 1860;
const SCREEN_HEIGHT: i32 = 2280;

fn app_class(name: &str) -> ClassSpec {
    ClassSpec::kotlin(&format!("{APP_PACKAGE}.{name}"))
}

fn widget(name: &str) -> ClassSpec {
    ClassSpec::java(&format!("android.widget.{name}"))
}

/// Identities of the main screen.
#[derive(Debug, Clone, Copy)]
pub struct MainScreen {
    pub window: SimWindow,
    pub page_container: ViewId,
    pub footer_container: ViewId,
    pub orange: FragmentId,
    pub blue: FragmentId,
    pub blue_view: ViewId,
}

/// What a finished run leaves behind.
#[derive(Debug)]
pub struct DemoOutcome {
    pub ui: SimulatedUi,
    pub main: MainScreen,
    pub secondary: SimWindow,
    /// Steps played, each one [`STEP_INTERVAL`] apart.
    pub steps: usize,
}

/// Drives a [`ReportEngine`] through the sample application.
pub struct Storyboard<'e> {
    engine: &'e mut ReportEngine,
    ui: SimulatedUi,
    now: Instant,
    steps: usize,
    next_resource: i32,
}

impl<'e> Storyboard<'e> {
    pub fn new(engine: &'e mut ReportEngine, start: Instant) -> Self {
        Self {
            engine,
            ui: SimulatedUi::new(),
            now: start,
            steps: 0,
            next_resource: 0x7f0a_0001,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.now
    }

    fn emit(&mut self, event: UiEvent) {
        self.now += STEP_INTERVAL;
        self.steps += 1;
        self.engine.on_event_at(&self.ui, event, self.now);
        self.engine.pump_at(&self.ui, self.now);
    }

    fn name_view(&mut self, view: ViewId, name: &str) {
        let id = self.next_resource;
        self.next_resource += 1;
        self.ui.define_resource(id, name);
        self.ui.set_view_id(view, id);
    }

    fn set_state(&mut self, activity: ActivityId, state: LifecycleState) {
        self.ui.set_state(activity, state);
        self.emit(UiEvent::activity(activity, state));
    }

    fn attach(&mut self, fragment: FragmentId, host: FragmentHost) {
        let parent = self.ui.host_label(host);
        self.emit(UiEvent::attached(fragment, parent));
    }

    /// Fragment whose view is a group with a single label.
    fn labelled_fragment(
        &mut self,
        host: FragmentHost,
        class: &str,
        container: ViewId,
        rect: Rect,
        name: &str,
    ) -> (FragmentId, ViewId) {
        let fragment = self.ui.add_fragment(host, app_class(class), None);
        let root = self.ui.add_group(container, widget("FrameLayout"));
        self.ui.set_rect(root, rect);
        self.name_view(root, name);
        let label = self.ui.add_view(root, widget("TextView"));
        self.ui.set_rect(label, rect);
        self.ui.set_fragment_view(fragment, Some(root));
        self.attach(fragment, host);
        (fragment, root)
    }

    fn dialog(&mut self, host: FragmentHost, class: &str, tag: &str) -> FragmentId {
        let fragment = self.ui.add_dialog_fragment(host, app_class(class), Some(tag));
        let decor = self.ui.add_window_view(widget("FrameLayout"), true);
        let label = self.ui.add_view(decor, widget("TextView"));
        self.ui.set_rect(label, Rect::new(140, 900, 940, 1380));
        self.ui.set_fragment_view(fragment, Some(decor));
        self.attach(fragment, host);
        fragment
    }

    /// Create the main screen, populate its fragments, and bring it to the
    /// foreground.
    pub fn launch_main(&mut self) -> MainScreen {
        let window = self.ui.add_activity(app_class("MainActivity"));
        let root = self.ui.add_group(window.content, widget("LinearLayout"));
        self.ui.set_rect(root, Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT));
        self.name_view(root, "main_root");
        let page_container = self.ui.add_group(root, widget("FrameLayout"));
        let page = Rect::new(0, 0, SCREEN_WIDTH, FOOTER_TOP);
        self.ui.set_rect(page_container, page);
        self.name_view(page_container, "page_container");
        let footer_container = self.ui.add_group(root, widget("FrameLayout"));
        let footer = Rect::new(0, FOOTER_TOP, SCREEN_WIDTH, SCREEN_HEIGHT);
        self.ui.set_rect(footer_container, footer);
        self.name_view(footer_container, "footer_container");
        self.emit(UiEvent::activity(window.activity, LifecycleState::Created));

        let host = FragmentHost::Activity(window.activity);

        let headless = self.ui.add_fragment(
            host,
            app_class("GreenFragment"),
            Some("fragment without container"),
        );
        self.attach(headless, host);

        let (orange, orange_view) =
            self.labelled_fragment(host, "OrangeFragment", page_container, page, "orange_root");
        let child_container = self.ui.add_group(orange_view, widget("FrameLayout"));
        let lower_half = Rect::new(0, FOOTER_TOP / 2, SCREEN_WIDTH, FOOTER_TOP);
        self.ui.set_rect(child_container, lower_half);
        self.name_view(child_container, "child_fragment_container");
        self.labelled_fragment(
            FragmentHost::Fragment(orange),
            "RedFragment",
            child_container,
            lower_half,
            "red_root",
        );
        self.dialog(
            FragmentHost::Fragment(orange),
            "OrangeDialogFragment",
            "orange dialog",
        );

        let (blue, blue_view) =
            self.labelled_fragment(host, "BlueFragment", page_container, page, "blue_root");
        self.labelled_fragment(host, "PurpleFragment", footer_container, footer, "purple_root");
        self.dialog(host, "GreenDialogFragment", "green dialog");

        self.set_state(window.activity, LifecycleState::Started);
        self.set_state(window.activity, LifecycleState::Resumed);
        self.emit(UiEvent::LayoutChanged);

        MainScreen {
            window,
            page_container,
            footer_container,
            orange,
            blue,
            blue_view,
        }
    }

    /// Hide the blue page so the orange one shows through.
    pub fn hide_blue(&mut self, main: &MainScreen) {
        self.ui.set_visibility(main.blue_view, Visibility::Gone);
        self.emit(UiEvent::LayoutChanged);
    }

    /// Start the secondary screen on top of the main one.
    pub fn open_secondary(&mut self, main: &MainScreen) -> SimWindow {
        let window = self.ui.add_activity(app_class("SecondaryActivity"));
        let label = self.ui.add_view(window.content, widget("TextView"));
        self.ui.set_rect(label, Rect::new(0, 0, SCREEN_WIDTH, 240));
        self.name_view(label, "secondary_label");
        self.set_state(main.window.activity, LifecycleState::Paused);
        self.emit(UiEvent::activity(window.activity, LifecycleState::Created));
        self.set_state(window.activity, LifecycleState::Started);
        self.set_state(window.activity, LifecycleState::Resumed);
        self.set_state(main.window.activity, LifecycleState::Stopped);
        self.emit(UiEvent::LayoutChanged);
        window
    }

    /// Let the last throttle window expire and flush its report.
    pub fn settle(&mut self) -> usize {
        self.now += self.engine.config().throttle_window + STEP_INTERVAL;
        self.engine.pump_at(&self.ui, self.now)
    }

    pub fn into_ui(self) -> SimulatedUi {
        self.ui
    }
}

/// Play the whole storyboard against `engine`.
pub fn run(engine: &mut ReportEngine, start: Instant) -> DemoOutcome {
    engine.explore_application();
    let mut board = Storyboard::new(engine, start);
    let main = board.launch_main();
    board.hide_blue(&main);
    let secondary = board.open_secondary(&main);
    board.settle();
    let steps = board.steps;
    tracing::info!(steps, "storyboard finished");
    DemoOutcome {
        ui: board.into_ui(),
        main,
        secondary,
        steps,
    }
}
