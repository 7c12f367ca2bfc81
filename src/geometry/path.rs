use eframe::egui::Pos2;

use super::polar::polar_to_cartesian;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
    Arc {
        center: Pos2,
        radius: f32,
        start_deg: f32,
        end_deg: f32,
        large_arc: bool,
        clockwise: bool,
        to: Pos2,
    },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathDescriptor {
    commands: Vec<PathCommand>,
}

impl PathDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polygon(points: &[Pos2]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
            path.close();
        }
        path
    }

    pub fn move_to(&mut self, point: Pos2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Pos2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn arc(
        &mut self,
        center: Pos2,
        radius: f32,
        start_deg: f32,
        end_deg: f32,
        clockwise: bool,
    ) -> &mut Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_deg,
            end_deg,
            large_arc: (end_deg - start_deg).abs() > 180.0,
            clockwise,
            to: polar_to_cartesian(center, radius, end_deg),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_svg_d(&self) -> String {
        self.commands
            .iter()
            .map(|command| match command {
                PathCommand::MoveTo(point) => format!("M {:.2} {:.2}", point.x, point.y),
                PathCommand::LineTo(point) => format!("L {:.2} {:.2}", point.x, point.y),
                PathCommand::Arc {
                    radius,
                    large_arc,
                    clockwise,
                    to,
                    ..
                } => format!(
                    "A {radius:.2} {radius:.2} 0 {} {} {:.2} {:.2}",
                    u8::from(*large_arc),
                    u8::from(*clockwise),
                    to.x,
                    to.y
                ),
                PathCommand::Close => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn flatten(&self, segments_per_quarter: usize) -> Vec<Pos2> {
        let segments_per_quarter = segments_per_quarter.max(1);
        let mut points = Vec::new();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) | PathCommand::LineTo(point) => points.push(point),
                PathCommand::Arc {
                    center,
                    radius,
                    start_deg,
                    end_deg,
                    ..
                } => {
                    let span = end_deg - start_deg;
                    let steps = ((span.abs() / 90.0) * segments_per_quarter as f32)
                        .ceil()
                        .max(1.0) as usize;
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        points.push(polar_to_cartesian(center, radius, start_deg + span * t));
                    }
                }
                PathCommand::Close => {}
            }
        }

        points
    }
}
