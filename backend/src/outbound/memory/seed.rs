//! Demo data loaded into the in-memory store.

use chrono::NaiveDate;

pub(super) struct SeedCustomer {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub image_url: &'static str,
}

pub(super) struct SeedInvoice {
    pub customer: usize,
    pub cents: i64,
    pub paid: bool,
    pub date: (i32, u32, u32),
}

pub(super) const CUSTOMERS: [SeedCustomer; 6] = [
    SeedCustomer {
        id: "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/customers/evil-rabbit.png",
    },
    SeedCustomer {
        id: "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/customers/delba-de-oliveira.png",
    },
    SeedCustomer {
        id: "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/customers/lee-robinson.png",
    },
    SeedCustomer {
        id: "76d65c26-f784-44a2-ac19-586678f7c2f2",
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/customers/michael-novotny.png",
    },
    SeedCustomer {
        id: "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/customers/amy-burns.png",
    },
    SeedCustomer {
        id: "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/customers/balazs-orban.png",
    },
];

pub(super) const INVOICES: [SeedInvoice; 13] = [
    SeedInvoice { customer: 0, cents: 15_795, paid: false, date: (2022, 12, 6) },
    SeedInvoice { customer: 1, cents: 20_348, paid: false, date: (2022, 11, 14) },
    SeedInvoice { customer: 4, cents: 3_040, paid: true, date: (2022, 10, 29) },
    SeedInvoice { customer: 3, cents: 44_800, paid: true, date: (2023, 9, 10) },
    SeedInvoice { customer: 5, cents: 34_577, paid: false, date: (2023, 8, 5) },
    SeedInvoice { customer: 2, cents: 54_246, paid: false, date: (2023, 7, 16) },
    SeedInvoice { customer: 0, cents: 666, paid: false, date: (2023, 6, 27) },
    SeedInvoice { customer: 3, cents: 32_545, paid: true, date: (2023, 6, 9) },
    SeedInvoice { customer: 4, cents: 1_250, paid: true, date: (2023, 6, 17) },
    SeedInvoice { customer: 5, cents: 8_546, paid: true, date: (2023, 6, 7) },
    SeedInvoice { customer: 1, cents: 500, paid: true, date: (2023, 8, 19) },
    SeedInvoice { customer: 5, cents: 8_945, paid: true, date: (2023, 6, 3) },
    SeedInvoice { customer: 2, cents: 1_000, paid: true, date: (2022, 6, 5) },
];

pub(super) const REVENUE: [(&str, i32); 12] = [
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

impl SeedInvoice {
    pub fn naive_date(&self) -> Option<NaiveDate> {
        let (year, month, day) = self.date;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
