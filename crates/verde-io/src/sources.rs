//! The fixed table of CSV sources the dashboard loads at startup.

/// One configured CSV source: logical dataset name and file name inside the
/// data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSource {
    pub name: &'static str,
    pub file: &'static str,
}

/// The datasets the dashboard serves, in rendering order.
pub const DEFAULT_SOURCES: &[DatasetSource] = &[
    DatasetSource {
        name: "Solar",
        file: "consumption.csv",
    },
    DatasetSource {
        name: "Capacidad Solar",
        file: "capacity.csv",
    },
    DatasetSource {
        name: "Hidroelectricidad",
        file: "05 hydropower-consumption.csv",
    },
    DatasetSource {
        name: "Eólica",
        file: "08 wind-generation.csv",
    },
    DatasetSource {
        name: "Biofuel",
        file: "16 biofuel-production.csv",
    },
    DatasetSource {
        name: "Geotermia",
        file: "17 installed-geothermal-capacity.csv",
    },
    DatasetSource {
        name: "Renovable Total",
        file: "02 modern-renewable-energy-consumption.csv",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_comes_first() {
        assert_eq!(DEFAULT_SOURCES[0].name, "Solar");
        assert_eq!(DEFAULT_SOURCES.len(), 7);
    }

    #[test]
    fn source_names_are_unique() {
        let mut names: Vec<&str> = DEFAULT_SOURCES.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_SOURCES.len());
    }
}
