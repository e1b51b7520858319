//! Plain-text report of a diagram's final state.

use std::fmt;

use devgraph::{Diagram, arrow::Arrow, device::DeviceId, view::DiagramView};

use crate::session::ReplaySummary;

/// Renders counters, mode, selection, devices and arrows.
pub struct Report<'a, V: DiagramView> {
    diagram: &'a Diagram<V>,
    summary: ReplaySummary,
}

impl<'a, V: DiagramView> Report<'a, V> {
    pub fn new(diagram: &'a Diagram<V>, summary: ReplaySummary) -> Self {
        Self { diagram, summary }
    }

    fn title(&self, id: DeviceId) -> &str {
        self.diagram
            .device(id)
            .map_or("<deleted>", |device| device.title())
    }

    fn arrow_label(&self, arrow: &Arrow) -> String {
        let end = arrow
            .end_device()
            .map_or("<cursor>", |end| self.title(end));
        format!("{} -> {}", self.title(arrow.start()), end)
    }
}

impl<V: DiagramView> fmt::Display for Report<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagram = self.diagram;

        writeln!(
            f,
            "gestures: {} applied, {} ignored, {} rejected",
            self.summary.applied, self.summary.ignored, self.summary.rejected
        )?;
        writeln!(f, "mode: {}", diagram.mode())?;
        writeln!(f, "{}", diagram.devices_counter())?;
        writeln!(f, "{}", diagram.arrows_counter())?;

        let selected_device = diagram
            .selected_device()
            .map_or("none", |id| self.title(id));
        writeln!(f, "selected device: {selected_device}")?;
        let selected_arrow = diagram
            .selected_arrow()
            .and_then(|id| diagram.arrow(id))
            .map_or_else(|| "none".to_string(), |arrow| self.arrow_label(arrow));
        writeln!(f, "selected arrow: {selected_arrow}")?;

        writeln!(f)?;
        writeln!(f, "[devices]")?;
        for device in diagram.devices() {
            let position = device.position();
            let size = device.size();
            write!(
                f,
                "{} ({}) at ({}, {}) size {}x{}",
                device.title(),
                device.device_type(),
                position.x(),
                position.y(),
                size.width(),
                size.height()
            )?;
            if let Some(value) = device.value() {
                write!(f, " value {value}")?;
            }
            writeln!(f)?;
            if let Ok(summary) = diagram.relation_summary(device.id()) {
                writeln!(f, "  {summary}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "[arrows]")?;
        for arrow in diagram.arrows() {
            let start = arrow.start_point();
            let end = arrow.end_point();
            writeln!(
                f,
                "{}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                self.arrow_label(arrow),
                start.x(),
                start.y(),
                end.x(),
                end.y()
            )?;
        }
        if let Some(arrow) = diagram.temporary_arrow() {
            writeln!(f, "{} (drawing)", self.arrow_label(arrow))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use devgraph::{config::AppConfig, geometry::Point};

    use super::*;

    #[test]
    fn test_report_lists_devices_and_arrows() {
        let mut diagram = Diagram::new(AppConfig::default());
        let sensor = diagram.config().palette().get("sensor").cloned().unwrap();
        let valve = diagram.config().palette().get("valve").cloned().unwrap();
        let a = diagram.add_device(&sensor, Point::new(0.0, 0.0)).unwrap();
        let b = diagram.add_device(&valve, Point::new(300.0, 0.0)).unwrap();
        diagram.activate_arrow_drawing();
        diagram.start_arrow(a).unwrap();
        diagram.finish_arrow(b).unwrap();

        let report = Report::new(&diagram, ReplaySummary::default()).to_string();

        assert!(report.contains("mode: idle"));
        assert!(report.contains("devices: 2"));
        assert!(report.contains("arrows: 1"));
        assert!(report.contains("Sensor 1 (sensor) at (0, 0) size 120x100"));
        assert!(report.contains("predecessors: [Sensor 1], successors: []"));
        assert!(report.contains("Sensor 1 -> Valve 2: (129.6, 50.0) -> (290.4, 50.0)"));
    }
}
