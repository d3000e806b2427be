use ligdock::engine::config::{
    DEFAULT_DOCKING_LOG_NAME, DEFAULT_DOCKING_OUTPUT_NAME, DEFAULT_DOCKING_PROGRAM,
    DEFAULT_EXTRACTION_PROGRAM, DEFAULT_LIGAND_EXTENSION, DEFAULT_NUM_MODELS,
};

pub struct DefaultsConfig {
    pub receptor: String,
    pub site: String,
    pub ligands: String,
    pub results: String,
    pub extension: String,
    pub docking_program: String,
    pub extraction_program: String,
    pub docking_output_name: String,
    pub docking_log_name: String,
    pub num_models: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            receptor: "receptor.pdb".to_string(),
            site: "site.txt".to_string(),
            ligands: "Ligands".to_string(),
            results: "Results".to_string(),
            extension: DEFAULT_LIGAND_EXTENSION.to_string(),
            docking_program: DEFAULT_DOCKING_PROGRAM.to_string(),
            extraction_program: DEFAULT_EXTRACTION_PROGRAM.to_string(),
            docking_output_name: DEFAULT_DOCKING_OUTPUT_NAME.to_string(),
            docking_log_name: DEFAULT_DOCKING_LOG_NAME.to_string(),
            num_models: DEFAULT_NUM_MODELS,
        }
    }
}
