use coord3d::scene::DiagramKind;

pub struct UiState {
    pub selected: DiagramKind,
    pub show_stats: bool,
    pub show_labels: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: DiagramKind::SphericalVolume,
            show_stats: true,
            show_labels: true,
        }
    }
}
