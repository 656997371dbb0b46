use avocet_core::types::SpeciesTaxon;

pub fn snapshot() -> Vec<SpeciesTaxon> {
    [
        ("norcar", "Northern Cardinal", "Cardinalis cardinalis", "species"),
        ("marwre", "Marsh Wren", "Cistothorus palustris", "species"),
        ("virrai", "Virginia Rail", "Rallus limicola", "species"),
        ("yebsap", "Yellow-bellied Sapsucker", "Sphyrapicus varius", "species"),
        ("heithr", "Hermit Thrush", "Catharus guttatus", "species"),
        ("grbher3", "Great Blue Heron", "Ardea herodias", "species"),
        ("belkin1", "Belted Kingfisher", "Megaceryle alcyon", "species"),
        ("osprey", "Osprey", "Pandion haliaetus", "species"),
        ("amebit", "American Bittern", "Botaurus lentiginosus", "species"),
        ("buffle", "Bufflehead", "Bucephala albeola", "species"),
        ("x00721", "Mallard x American Black Duck (hybrid)", "Anas platyrhynchos x rubripes", "hybrid"),
    ]
    .iter()
    .map(|&(code, common, scientific, category)| SpeciesTaxon {
        species_code: code.to_string(),
        common_name: common.to_string(),
        scientific_name: scientific.to_string(),
        category: category.to_string(),
    })
    .collect()
}
