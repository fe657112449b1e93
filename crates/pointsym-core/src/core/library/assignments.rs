use phf::{Map, phf_map};

/// Curated point groups keyed by normalized molecule name or formula.
static POINT_GROUPS: Map<&'static str, &'static str> = phf_map! {
    "water" => "C2v",
    "h2o" => "C2v",
    "ammonia" => "C3v",
    "nh3" => "C3v",
    "methane" => "Td",
    "ch4" => "Td",
    "hydrogenfluoride" => "C∞v",
    "hf" => "C∞v",
    "hydrogenchloride" => "C∞v",
    "hcl" => "C∞v",
    "carbonmonoxide" => "C∞v",
    "co" => "C∞v",
    "hydrogencyanide" => "C∞v",
    "hcn" => "C∞v",
    "carbondioxide" => "D∞h",
    "co2" => "D∞h",
    "hydrogen" => "D∞h",
    "h2" => "D∞h",
    "nitrogen" => "D∞h",
    "n2" => "D∞h",
    "oxygen" => "D∞h",
    "o2" => "D∞h",
    "acetylene" => "D∞h",
    "ethyne" => "D∞h",
    "c2h2" => "D∞h",
    "cyanogen" => "D∞h",
    "c2n2" => "D∞h",
    "sulfurdioxide" => "C2v",
    "so2" => "C2v",
    "ozone" => "C2v",
    "o3" => "C2v",
    "formaldehyde" => "C2v",
    "methanal" => "C2v",
    "h2co" => "C2v",
    "ch2o" => "C2v",
    "phosphine" => "C3v",
    "ph3" => "C3v",
    "borontrifluoride" => "D3h",
    "bf3" => "D3h",
    "carbontetrachloride" => "Td",
    "ccl4" => "Td",
    "chloroform" => "C3v",
    "trichloromethane" => "C3v",
    "chcl3" => "C3v",
    "ethylene" => "D2h",
    "ethene" => "D2h",
    "c2h4" => "D2h",
    "allene" => "D2d",
    "propadiene" => "D2d",
    "sulfurhexafluoride" => "Oh",
    "sf6" => "Oh",
    "benzene" => "D6h",
    "c6h6" => "D6h",
    "hydrogenperoxide" => "C2",
    "h2o2" => "C2",
    "transdichloroethylene" => "C2h",
    "trans12dichloroethene" => "C2h",
    "ethanestaggered" => "D3d",
    "ethane" => "D3d",
    "c2h6" => "D3d",
    "xenontetrafluoride" => "D4h",
    "xef4" => "D4h",
    "hypochlorousacid" => "Cs",
    "hocl" => "Cs",
};

/// Normalizes a molecule name for lookup: lowercase, letters and digits only.
///
/// `"Water"`, `"water"` and `" WATER "` share a key, as do `"trans-Dichloroethylene"` and
/// `"trans dichloroethylene"`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The curated point-group identifier for a molecule name, if one is known.
pub fn point_group_for(name: &str) -> Option<&'static str> {
    POINT_GROUPS.get(normalize_name(name).as_str()).copied()
}
