#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const CELL_COUNTS: &str = "\
project,subject,condition,age,sex,treatment,response,sample,sample_type,time_from_treatment_start,b_cell,cd8_t_cell,cd4_t_cell,nk_cell,monocyte
prj1,sbj1,melanoma,57,M,miraclib,yes,s1,PBMC,0,100,200,300,200,200
prj1,sbj2,melanoma,61,F,miraclib,no,s2,PBMC,0,300,100,200,200,200
prj2,sbj3,melanoma,45,F,miraclib,yes,s3,PBMC,0,150,150,300,200,200
prj2,sbj4,melanoma,70,M,miraclib,no,s4,PBMC,0,250,150,200,200,200
prj1,sbj1,melanoma,57,M,miraclib,yes,s5,PBMC,7,120,180,300,200,200
prj1,sbj5,carcinoma,50,F,miraclib,yes,s6,PBMC,0,100,100,400,200,200
prj1,sbj6,melanoma,66,,miraclib,,s7,PBMC,0,200,200,200,200,200
prj3,sbj7,melanoma,40,M,phauximab,no,s8,PBMC,0,200,200,200,200,200
prj1,sbj2,melanoma,61,F,miraclib,no,s9,WB,0,200,200,200,200,200
";

pub fn write_cell_counts(dir: &Path) -> PathBuf {
    let path = dir.join("cell-count.csv");
    fs::write(&path, CELL_COUNTS).unwrap();
    path
}
