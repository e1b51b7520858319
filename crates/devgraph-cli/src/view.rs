//! A view that renders diagram changes as log records.

use log::debug;

use devgraph::{
    arrow::{Arrow, ArrowId},
    counter::Counter,
    device::{Device, DeviceId},
    geometry::Point,
    view::{Affordance, DiagramView, RelationSummary},
};

/// Logs every view notification at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogView;

impl DiagramView for LogView {
    fn device_added(&mut self, device: &Device, image: Option<&str>) {
        debug!(
            device_id:% = device.id(),
            title = device.title(),
            has_image = image.is_some();
            "View: device added"
        );
    }

    fn device_moved(&mut self, device: &Device) {
        debug!(
            device_id:% = device.id(),
            x = device.position().x(),
            y = device.position().y(),
            width = device.size().width(),
            height = device.size().height();
            "View: device moved"
        );
    }

    fn device_removed(&mut self, device: DeviceId) {
        debug!(device_id:% = device; "View: device removed");
    }

    fn device_activated(&mut self, device: DeviceId, active: bool) {
        debug!(device_id:% = device, active = active; "View: device activation changed");
    }

    fn relations_changed(&mut self, device: DeviceId, summary: &RelationSummary) {
        debug!(device_id:% = device, summary:% = summary; "View: relations changed");
    }

    fn arrow_drawn(&mut self, arrow: &Arrow) {
        debug!(
            arrow_id:% = arrow.id(),
            committed = arrow.is_committed(),
            start_x = arrow.start_point().x(),
            start_y = arrow.start_point().y(),
            end_x = arrow.end_point().x(),
            end_y = arrow.end_point().y();
            "View: arrow drawn"
        );
    }

    fn arrow_removed(&mut self, arrow: ArrowId) {
        debug!(arrow_id:% = arrow; "View: arrow removed");
    }

    fn arrow_activated(&mut self, arrow: ArrowId, active: bool) {
        debug!(arrow_id:% = arrow, active = active; "View: arrow activation changed");
    }

    fn arrow_mode_changed(&mut self, active: bool) {
        debug!(active = active; "View: arrow mode changed");
    }

    fn affordance_changed(&mut self, affordance: Option<Affordance>) {
        match affordance {
            Some(affordance) => debug!(
                device_id:% = affordance.device(),
                x = affordance.position().x(),
                y = affordance.position().y();
                "View: affordance shown"
            ),
            None => debug!("View: affordance hidden"),
        }
    }

    fn context_menu_requested(&mut self, device: DeviceId, position: Point) {
        debug!(device_id:% = device, x = position.x(), y = position.y(); "View: context menu requested");
    }

    fn counter_changed(&mut self, counter: &Counter) {
        debug!(counter:% = counter; "View: counter changed");
    }
}
