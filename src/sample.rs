//! Bundled sample hierarchies for demos and manual testing
//!
//! Each outline is plain text, one node per line, nested by two-space
//! indentation. Seeding goes through [`TreeApi::create_node`], so every
//! sample node gets a normal store-assigned id.

use tracing::info;

use crate::api::{ApiResult, TreeApi};
use crate::forest::{Node, NodeId};

const INDENT: usize = 2;

pub const TECH_COMPANY: &str = "
Sarah Chen - CEO
  Michael Kumar - CTO
    VP Engineering - James Wilson
      Director Backend - Amy Zhang
        API Services Team
          Alice Johnson - Senior Engineer
          Bob Smith - Engineer
          Carol Davis - Engineer
        Data Platform Team
          David Lee - Staff Engineer
          Emma Garcia - Senior Engineer
          Frank Miller - Engineer
        Infrastructure Team
          Grace Kim - Principal Engineer
          Henry Brown - Senior Engineer
      Director Frontend - Tom Rodriguez
        Web Platform Team
          Ivy Thompson - Tech Lead
          Jack Wilson - Senior Engineer
          Kate Martinez - Engineer
        Mobile Team
          Liam Anderson - iOS Lead
          Maya Patel - Android Lead
          Noah White - React Native Engineer
      Director QA - Olivia Brown
        Automation Team
          Paul Green - QA Lead
          Quinn Davis - QA Engineer
        Manual QA Team
          Rachel Foster - QA Lead
          Sam Cooper - QA Engineer
    DevOps Team
      Tony Stark - DevOps Lead
      Uma Thurman - Site Reliability Engineer
      Victor Hugo - Cloud Engineer
    Security Team
      Wendy Wu - Security Lead
      Xavier Knight - Security Engineer
  Jennifer Williams - CFO
    Accounting Department
      Yara Singh - Controller
      Zack Morgan - Accountant
    FP&A Department
      Anna Bell - FP&A Lead
      Brian Cox - Financial Analyst
  David Martinez - CMO
    Digital Marketing
      Claire Hunt - Digital Marketing Manager
      Derek Fox - SEO Specialist
      Ella Moore - Content Marketer
    Brand & Communications
      Felix Stone - Brand Manager
      Gina Ross - PR Manager
  Lisa Anderson - COO
    Customer Success
      Hannah Lake - CS Manager
      Ian Cross - CS Lead
    Sales Department
      Julia Reed - VP Sales
      Kevin Park - Enterprise Sales
      Laura Chen - SMB Sales
  Robert Taylor - CHRO
    Recruiting
      Mike Flynn - Recruiting Manager
      Nina Bell - Technical Recruiter
    People Operations
      Oscar Wade - People Ops Manager
";

pub const RETAIL_COMPANY: &str = "
RetailCo - John Retail (CEO)
  Store Operations
    West Region
      San Francisco Store
      Los Angeles Store
      Seattle Store
    East Region
      New York Store
      Boston Store
  Supply Chain
    Procurement Team
    Logistics Team
    Warehouse Operations
";

pub const UNIVERSITY: &str = "
State University
  Academic Affairs
    College of Engineering
      Computer Science Department
        Algorithms Course
        Databases Course
        AI/ML Course
      Electrical Engineering Department
        Circuits Course
        Signals Course
    College of Arts & Sciences
      Mathematics Department
        Calculus Course
        Linear Algebra Course
      Physics Department
        Quantum Mechanics Course
  Student Affairs
    Housing & Residence Life
    Career Services
    Student Activities
";

pub const FILESYSTEM: &str = "
root (/)
  home
    alice
      documents
      downloads
      projects
    bob
      documents
      music
  etc
    nginx
    ssh
    systemd
  var
    log
      nginx
      syslog
";

pub const PRODUCT_CATALOGUE: &str = "
Electronics
  Computers & Tablets
    Laptops
      Gaming Laptops
      Business Laptops
      Ultrabooks
    Desktop Computers
      Gaming PCs
      Workstations
    Tablets
      iPad
      Android Tablets
  Mobile Devices
    Smartphones
      iPhone
      Samsung Galaxy
      Google Pixel
    Accessories
      Phone Cases
      Screen Protectors
      Chargers & Cables
  Audio
    Headphones
      Over-Ear Headphones
      In-Ear Headphones
      True Wireless Earbuds
    Speakers
      Bluetooth Speakers
      Smart Speakers
";

/// Every bundled outline, in seeding order
pub const ALL: &[&str] = &[
    TECH_COMPANY,
    RETAIL_COMPANY,
    UNIVERSITY,
    FILESYSTEM,
    PRODUCT_CATALOGUE,
];

/// Insert every bundled outline and return the created roots
pub fn seed(api: &TreeApi) -> ApiResult<Vec<Node>> {
    let mut roots = Vec::new();
    for outline in ALL {
        roots.extend(seed_outline(api, outline)?);
    }
    info!(roots = roots.len(), "seeded sample data");
    Ok(roots)
}

/// Insert one indented outline, parents before children
///
/// Blank lines are skipped. A line indented deeper than one level below the
/// previous line is attached to the previous line. Returns the top-level
/// nodes created, in order.
pub fn seed_outline(api: &TreeApi, outline: &str) -> ApiResult<Vec<Node>> {
    let mut roots = Vec::new();
    // (depth, id) for the current chain of ancestors
    let mut ancestors: Vec<(usize, NodeId)> = Vec::new();

    for line in outline.lines() {
        let label = line.trim();
        if label.is_empty() {
            continue;
        }
        let depth = (line.len() - line.trim_start().len()) / INDENT;

        while ancestors.last().is_some_and(|&(d, _)| d >= depth) {
            ancestors.pop();
        }

        let parent = ancestors.last().map(|&(_, id)| id);
        let node = api.create_node(label, parent)?;
        ancestors.push((depth, node.id));
        if parent.is_none() {
            roots.push(node);
        }
    }

    Ok(roots)
}
