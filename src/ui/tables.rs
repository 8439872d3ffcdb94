use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::ContactRow;
use crate::data::model::{RtoDataset, RtoRecord};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;
const MAX_TABLE_HEIGHT: f32 = 320.0;

/// Every source column of the filtered rows.
pub fn data_table(ui: &mut Ui, dataset: &RtoDataset, rows: &[&RtoRecord]) {
    let headers = &dataset.schema.headers;
    ui.push_id("data_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .columns(Column::auto().at_least(60.0).clip(true), headers.len())
            .header(HEADER_HEIGHT, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let rec = rows[row.index()];
                    for h in headers {
                        let text = dataset.cell(rec, h).unwrap_or_default();
                        row.col(|ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

/// Legal name plus the CEO contact columns.
pub fn contact_table(ui: &mut Ui, contacts: &[ContactRow<'_>]) {
    ui.push_id("contact_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .columns(Column::auto().at_least(80.0).clip(true), ContactRow::HEADERS.len())
            .header(HEADER_HEIGHT, |mut header| {
                for h in ContactRow::HEADERS {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, contacts.len(), |mut row| {
                    for cell in contacts[row.index()].cells() {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
