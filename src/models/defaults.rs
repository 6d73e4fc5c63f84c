//! Built-in site content shipped with the binary.
//!
//! Returned whenever the local store holds no usable content record.

use super::{
    About, Company, Contact, ContentRecord, Credential, Hero, Partner, Project, ProjectStatus,
    Service, ServiceColor, SocialMedia,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Feature list shared by most of the residential reference projects.
const STANDARD_FEATURES: &[&str] = &[
    "Small power & Lighting",
    "Earthing & Lightning protection",
    "Cable Management systems",
    "Motion detection in parking",
    "Structural cabling",
    "CCTV provisions",
    "TV point provisions",
    "Façade lighting",
];

const APARTMENT_DESCRIPTION: &str = "Comprehensive electrical installation for residential apartments with advanced security and lighting systems. Client: Mama Sarah & Others.";

fn completed_project(
    id: &str,
    title: &str,
    location: &str,
    image: &str,
    description: &str,
    features: Vec<String>,
) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        units: 0,
        year: "2024".to_string(),
        image: image.to_string(),
        description: description.to_string(),
        features,
        status: ProjectStatus::Completed,
    }
}

fn service(id: &str, title: &str, description: &str, features: &[&str], color: ServiceColor) -> Service {
    Service {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        features: strings(features),
        color,
    }
}

impl Default for ContentRecord {
    fn default() -> Self {
        let mut amki_features = strings(STANDARD_FEATURES);
        amki_features.insert(7, "Intercom provisions".to_string());

        Self {
            hero: Hero {
                title: "Bringing Power and\nReliability to Your World".to_string(),
                subtitle: "Tayyar Electricals".to_string(),
                description:
                    "Expert solutions for your electrical wiring, installation, and repair needs."
                        .to_string(),
                cta_text: "Get Free Quote".to_string(),
                cta_secondary_text: "View Services".to_string(),
            },
            about: About {
                title: "About Tayyar Electricals".to_string(),
                description: strings(&[
                    "Tayyar Electricals Limited (TEL) is a registered Electrical Engineering company based in Nairobi, Kenya. TEL has been involved in many projects varying in magnitude, type and complexity.",
                    "We have gained experience and confidence over the years through thorough handling and successful completion of all our projects, both in the private and public sectors. Our operations have covered construction and installation works for diverse industrial concerns as well as multistory commercial buildings and residential complexes. In addition, we have a fully-fledged maintenance department serving domestic and commercial needs.",
                    "We believe that the ensuing benefits of our enhanced efficiency shall be reflected by quicker and more accurate response to inquiries and lower costs due to optimum material and time utilization. All of which we tailor to our esteemed clients.",
                ]),
                values: strings(&[
                    "Safety is our top priority in every project",
                    "Quality workmanship with attention to detail",
                    "Transparent pricing with no hidden costs",
                    "Reliable service and timely project completion",
                    "Ongoing support and maintenance services",
                ]),
                credentials: vec![
                    Credential {
                        title: "Licensed Electrician".to_string(),
                        description: "Fully licensed and certified electrical contractor with state certification".to_string(),
                    },
                    Credential {
                        title: "Insured & Bonded".to_string(),
                        description: "Comprehensive insurance coverage and bonding for your peace of mind".to_string(),
                    },
                    Credential {
                        title: "Experienced Team".to_string(),
                        description: "15+ years of experience in residential and commercial electrical work".to_string(),
                    },
                    Credential {
                        title: "Code Compliant".to_string(),
                        description: "All work meets or exceeds current electrical codes and safety standards".to_string(),
                    },
                ],
            },
            services: vec![
                service(
                    "residential-commercial",
                    "Residential & Commercial",
                    "Comprehensive electrical installation services for residential apartments, commercial buildings, shopping malls, and hospitals & health facilities.",
                    &["Residential Apartments", "Commercial Buildings", "Shopping Malls", "Hospitals & Health Facilities"],
                    ServiceColor::Blue,
                ),
                service(
                    "industrial-infrastructure",
                    "Industrial & Infrastructure",
                    "Specialized electrical installations for data centers, factories, warehouses, and learning institutions with advanced power systems.",
                    &["Data Centers", "Factories", "Warehouses", "Learning Institutions"],
                    ServiceColor::Green,
                ),
                service(
                    "power-systems",
                    "Power Systems & Substations",
                    "High voltage and low voltage substation installations, airfield lighting systems, and power reticulation for estates, towns & cities.",
                    &["HV & LV Substations", "Airfield Lighting (AGL)", "Power Reticulations", "Estate Power Systems"],
                    ServiceColor::Orange,
                ),
                service(
                    "maintenance-support",
                    "Maintenance & Support",
                    "Fully-fledged maintenance department serving domestic and commercial needs with comprehensive support services.",
                    &["Preventive Maintenance", "Emergency Repairs", "Domestic Services", "Commercial Support"],
                    ServiceColor::Purple,
                ),
            ],
            projects: vec![
                completed_project(
                    "mama-sarah-apartments",
                    "Residential Apartments on Plot No. LRN036/VII/201",
                    "Nairobi",
                    "/Mama sarah.jpg",
                    APARTMENT_DESCRIPTION,
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "tamam-heights",
                    "Tamam Heights",
                    "Nairobi",
                    "/Tamam heights.jpg",
                    "Mixed-use development containing shops and apartments with comprehensive electrical systems. Client: Abdi Salam & Others.",
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "amki-developments",
                    "Amki Developments",
                    "Parklands",
                    "/Amki developers.jpg",
                    "Apartment development in Parklands where we serve as consultant in charge of design and supervision.",
                    amki_features,
                ),
                completed_project(
                    "nasri-towers",
                    "Nasri Towers",
                    "Ushirika",
                    "/Nasri towers.jpg",
                    "Mixed-use development at Ushirika containing apartments and a supermarket with advanced electrical systems.",
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "khaleel-towers",
                    "Khaleel Towers",
                    "Parklands",
                    "/Khaleel towers- Parklands.jpg",
                    APARTMENT_DESCRIPTION,
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "nomad-heights",
                    "Nomad Heights",
                    "Eastleigh",
                    "/Nomad Heights- Eastleigh.jpg",
                    APARTMENT_DESCRIPTION,
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "sagal-heights",
                    "Sagal Heights",
                    "Juja road",
                    "/Sagal Heights- Juja road.jpg",
                    APARTMENT_DESCRIPTION,
                    strings(STANDARD_FEATURES),
                ),
                completed_project(
                    "tamaam-ii-towers",
                    "Tamaam II Towers",
                    "Eastleigh",
                    "/Tamaam II Towers- Eastleigh.jpg",
                    APARTMENT_DESCRIPTION,
                    strings(STANDARD_FEATURES),
                ),
            ],
            contact: Contact {
                phone: "+254 727 381169".to_string(),
                email: "info@tayyarelectricals.com".to_string(),
                address: "Al Falaq Building S1 3rd Street, Eastleigh Nairobi Kenya".to_string(),
                business_hours: "Mon-Fri: 7AM-6PM".to_string(),
                emergency_available: true,
            },
            partners: vec![Partner {
                id: "partner-network".to_string(),
                name: "Partner Network".to_string(),
                logo: "/partners.PNG".to_string(),
                description: "Our trusted partner ecosystem".to_string(),
            }],
            company: Company {
                name: "Tayyar Electricals".to_string(),
                tagline: "Professional Electrical Services".to_string(),
                logo: "/Tayyar logo.jpg".to_string(),
                social_media: SocialMedia {
                    facebook: "https://web.facebook.com/Tayyar.elecric".to_string(),
                    linkedin: "https://www.linkedin.com/in/tayyar-electricals-623008259/?original_referer=https%3A%2F%2Fwww%2Egoogle%2Ecom%2F&originalSubdomain=ke".to_string(),
                },
            },
        }
    }
}
