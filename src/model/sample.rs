//! Sample claim dataset used for demo runs and the downloadable template

/// File name offered for the template download
pub const TEMPLATE_FILE_NAME: &str = "claim_template.csv";

/// File name recorded for sample runs started from the upload form
pub const SAMPLE_FILE_NAME: &str = "sample_data.csv";

/// File name recorded for demo runs
pub const DEMO_FILE_NAME: &str = "Demo Analysis";

pub const SAMPLE_CLAIMS_CSV: &str = "claim_id,policy_id,age,gender,incident_date,incident_type,authority_contacted,incident_severity,driver_rating,total_claim_amount,injury_claim,property_claim,vehicle_claim
1,POL-001,35,Male,2023-01-15,Single Vehicle Collision,Police,Major Damage,4,50000,15000,10000,25000
2,POL-002,28,Female,2023-02-20,Multi-vehicle Collision,Ambulance,Minor Damage,3,15000,5000,5000,5000
3,POL-003,45,Male,2023-03-10,Parked Car,None,Trivial Damage,5,2000,0,2000,0
4,POL-004,60,Female,2023-04-05,Single Vehicle Collision,Fire,Total Loss,2,75000,25000,20000,30000
5,POL-005,22,Male,2023-05-12,Multi-vehicle Collision,Police,Major Damage,1,120000,40000,30000,50000
6,POL-006,39,Female,2023-01-25,Vehicle Theft,Police,Trivial Damage,4,7000,0,0,7000
7,POL-007,52,Male,2023-02-18,Parked Car,None,Minor Damage,5,3500,500,3000,0
8,POL-008,31,Female,2023-03-22,Single Vehicle Collision,Ambulance,Major Damage,3,62000,22000,10000,30000
9,POL-009,41,Male,2023-04-19,Multi-vehicle Collision,Police,Minor Damage,4,18000,6000,6000,6000
10,POL-010,25,Female,2023-05-30,Vehicle Theft,Police,Trivial Damage,5,9500,0,0,9500
11,POL-011,58,Male,2023-06-01,Single Vehicle Collision,None,Minor Damage,3,11500,4500,3000,4000
12,POL-012,33,Female,2023-06-15,Multi-vehicle Collision,Police,Major Damage,2,85000,30000,20000,35000
";
