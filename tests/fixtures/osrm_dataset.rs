//! Downloads and preprocesses an OSRM extract for live routing tests.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A prepared MLD dataset ready for `osrm-routed`.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_file: String,
}

#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    Http(reqwest::Error),
    Docker(String),
}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> Self {
        DatasetError::Io(err)
    }
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        DatasetError::Http(err)
    }
}

/// Ensures the Geofabrik `region` (e.g. "north-america/us/nevada") is
/// downloaded under `data_root` and run through extract/partition/customize.
pub fn ensure(region: &str, data_root: &Path) -> Result<OsrmDataset, DatasetError> {
    let name = region.rsplit('/').next().unwrap_or("region");
    let data_dir = std::env::current_dir()?.join(data_root).join(name);
    fs::create_dir_all(&data_dir)?;

    let pbf_file = format!("{}-latest.osm.pbf", name);
    let osrm_file = format!("{}-latest.osrm", name);

    let pbf_path = data_dir.join(&pbf_file);
    if !pbf_path.exists() {
        download(&format!("https://download.geofabrik.de/{}-latest.osm.pbf", region), &pbf_path)?;
    }
    if !data_dir.join(&osrm_file).exists() {
        osrm_tool(&data_dir, &["osrm-extract", "-p", "/opt/car.lua", &format!("/data/{}", pbf_file)])?;
    }
    if !data_dir.join(format!("{}.partition", osrm_file)).exists() {
        osrm_tool(&data_dir, &["osrm-partition", &format!("/data/{}", osrm_file)])?;
        osrm_tool(&data_dir, &["osrm-customize", &format!("/data/{}", osrm_file)])?;
    }

    Ok(OsrmDataset { data_dir, osrm_file })
}

fn download(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn osrm_tool(data_dir: &Path, args: &[&str]) -> Result<(), DatasetError> {
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(DatasetError::Docker(format!("{} exited with {}", args[0], status)))
    }
}
